//! Orchestrator mode — reconciliation loop plus the privileged API.
//!
//! In this mode the daemon:
//! 1. Spawns the reconciliation loop over the configured worker fleet
//! 2. Serves the privileged health-check and liveness endpoints
//! 3. Stops the loop via a watch channel on graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use stage_core::Settings;
use stagehand_api::{OrchestratorState, orchestrator_router};
use stagehand_reconcile::Reconciler;

/// Run the orchestrator role until shutdown.
pub async fn run_orchestrator(port: u16, settings: Settings) -> anyhow::Result<()> {
    info!("Stagehand daemon starting in orchestrator mode");

    let settings = Arc::new(settings);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Reconciliation loop.
    let mut reconciler = Reconciler::from_settings(&settings);
    let interval = settings.reconcile_interval;
    let reconcile_handle = tokio::spawn(async move {
        reconciler.run(interval, shutdown_rx).await;
    });

    // Privileged API.
    let router = orchestrator_router(OrchestratorState::new(settings));
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "orchestrator API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install CTRL+C handler");
            info!("shutdown signal received");
            let _ = shutdown_tx.send(true);
        })
        .await?;

    let _ = reconcile_handle.await;
    info!("orchestrator stopped");
    Ok(())
}
