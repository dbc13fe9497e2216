//! stagehand-health — liveness probing for the worker fleet.
//!
//! Probes each configured worker's health endpoint with an independent,
//! timeout-bounded HTTP request and returns the healthy subset in input
//! order. Probe failures are fully absorbed here: the caller always gets
//! a set, never an error. Connection-level failures additionally land in
//! an append-only audit log.

pub mod audit;
pub mod probe;

pub use audit::AuditLog;
pub use probe::{ProbeResult, probe_fleet, probe_worker};
