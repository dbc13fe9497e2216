//! Upstream block rendering.

use stage_core::WorkerDescriptor;
use stage_core::types::WORKER_PORT;

/// Render the `worker_vms` upstream block for the given healthy set.
///
/// Deterministic in the set's order. The `hash $cookie_ticket consistent`
/// directive pins repeated requests from one client to the same upstream
/// for as long as it stays healthy.
pub fn render_upstream(workers: &[WorkerDescriptor]) -> String {
    let entries = workers
        .iter()
        .map(|w| format!("    server {}:{WORKER_PORT} max_fails=3 fail_timeout=5s;", w.name))
        .collect::<Vec<_>>()
        .join("\n");

    format!("upstream worker_vms {{\n    hash $cookie_ticket consistent;\n{entries}\n}}")
}
