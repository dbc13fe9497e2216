//! Error types shared across Stagehand crates.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the core crate.
///
/// Configuration errors are the only startup-fatal class in the system;
/// everything downstream absorbs its own failures.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    Config(String),
}
