//! stage-core — shared domain types for Stagehand.
//!
//! Holds the worker fleet model, the environment-sourced settings both
//! daemon roles read at startup, and the shared error type. Everything
//! here is plain data; behaviour lives in the role-specific crates.

pub mod error;
pub mod settings;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use settings::{Settings, TICKET_COOKIE};
pub use types::{HealthySet, WorkerDescriptor};
