//! Domain types for the Stagehand fleet.

use serde::{Deserialize, Serialize};

/// The port every worker serves on, baked into the fleet topology.
pub const WORKER_PORT: u16 = 8080;

/// A worker process known to the orchestrator.
///
/// The fleet is defined once at startup from the configured name list and
/// is immutable for the process lifetime. Probing happens in list order,
/// which fixes the order of the healthy set and of the rendered upstream
/// block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkerDescriptor {
    /// Resolvable host name of the worker (e.g. `worker-a`).
    pub name: String,
    /// Full URL of the worker's liveness endpoint.
    pub health_url: String,
}

impl WorkerDescriptor {
    /// Build the descriptor for a named worker.
    pub fn for_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            health_url: format!("http://{name}:{WORKER_PORT}/admin/api/health"),
        }
    }
}

/// The subset of workers currently considered reachable, in probe order.
///
/// Produced wholesale by each probe pass and handed directly to the proxy
/// configurator; never shared or partially mutated.
pub type HealthySet = Vec<WorkerDescriptor>;
