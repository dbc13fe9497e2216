//! Worker mode — ticket issuance, cue relay, and the diagnostics gate.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use stage_core::Settings;
use stagehand_api::{WorkerState, worker_router};

/// Run the worker role until shutdown.
pub async fn run_worker(port: u16, settings: Settings) -> anyhow::Result<()> {
    let hostname = std::env::var("HOSTNAME").unwrap_or_else(|_| "worker".to_string());
    info!(%hostname, "Stagehand daemon starting in worker mode");

    let state = WorkerState::new(Arc::new(settings));
    let router = worker_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "worker API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install CTRL+C handler");
            info!("shutdown signal received");
        })
        .await?;

    info!("worker stopped");
    Ok(())
}
