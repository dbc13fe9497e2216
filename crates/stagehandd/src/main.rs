//! stagehandd — the Stagehand daemon.
//!
//! One binary, two roles:
//! - **worker**: issues session tickets and serves the cue relay and the
//!   gated diagnostics endpoint.
//! - **orchestrator**: runs the fleet reconciliation loop and serves the
//!   privileged health-check endpoint.
//!
//! # Usage
//!
//! ```text
//! stagehandd worker --port 8080
//! stagehandd orchestrator --port 8080
//! ```
//!
//! Runtime behaviour is tuned through `STAGEHAND_*` environment
//! variables; see `stage_core::Settings`.

use clap::{Parser, Subcommand};

use stage_core::Settings;

mod orchestrator_mode;
mod worker_mode;

#[derive(Parser)]
#[command(name = "stagehandd", about = "Stagehand daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the worker role (tickets, cue relay, diagnostics gate).
    Worker {
        /// Port to listen on.
        #[arg(long, default_value = "8080")]
        port: u16,
    },
    /// Run the orchestrator role (reconciliation loop, privileged probe).
    Orchestrator {
        /// Port to listen on.
        #[arg(long, default_value = "8080")]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,stagehand=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    match cli.command {
        Command::Worker { port } => worker_mode::run_worker(port, settings).await,
        Command::Orchestrator { port } => {
            orchestrator_mode::run_orchestrator(port, settings).await
        }
    }
}
