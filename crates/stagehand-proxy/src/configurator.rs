//! Write-on-change configuration apply and proxy reload.

use std::path::PathBuf;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, error, info};

use stage_core::WorkerDescriptor;

use crate::render::render_upstream;

/// Errors from a configuration apply attempt.
///
/// These never leave the configurator; `apply` logs and absorbs them so a
/// broken proxy container cannot take the reconciliation loop down.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("failed to write config: {0}")]
    Write(#[source] std::io::Error),

    #[error("failed to run reload command: {0}")]
    ReloadSpawn(#[source] std::io::Error),

    #[error("reload command exited with {0}")]
    ReloadStatus(std::process::ExitStatus),
}

/// Renders, writes, and reloads the proxy upstream config.
///
/// Owns the `last written` cache: a cycle whose rendered text equals the
/// cached text is a byte-for-byte no-op (no write, no reload). The cache
/// is only advanced after a reload attempt was issued successfully, so a
/// failed apply is retried by the next cycle that still sees the change.
pub struct ProxyConfigurator {
    config_path: PathBuf,
    reload_cmd: Vec<String>,
    last_config: Option<String>,
}

impl ProxyConfigurator {
    /// Create a configurator targeting `config_path`, reloading the proxy
    /// with `reload_cmd` (argv, first element is the program).
    pub fn new(config_path: impl Into<PathBuf>, reload_cmd: Vec<String>) -> Self {
        Self {
            config_path: config_path.into(),
            reload_cmd,
            last_config: None,
        }
    }

    /// The last text successfully written and reloaded, if any.
    pub fn last_config(&self) -> Option<&str> {
        self.last_config.as_deref()
    }

    /// Reconcile the proxy config with the given healthy set.
    ///
    /// All failures are caught and logged here; the caller's loop keeps
    /// running and the config stays stale until a later cycle succeeds.
    pub async fn apply(&mut self, healthy: &[WorkerDescriptor]) {
        let rendered = render_upstream(healthy);

        if self.last_config.as_deref() == Some(rendered.as_str()) {
            debug!("upstream config unchanged, skipping write and reload");
            return;
        }

        match self.write_and_reload(&rendered).await {
            Ok(()) => {
                let names: Vec<&str> = healthy.iter().map(|w| w.name.as_str()).collect();
                info!(workers = ?names, "proxy reloaded with new upstream set");
                self.last_config = Some(rendered);
            }
            Err(e) => {
                error!(error = %e, path = ?self.config_path, "failed to update proxy config");
            }
        }
    }

    async fn write_and_reload(&self, rendered: &str) -> Result<(), ProxyError> {
        tokio::fs::write(&self.config_path, rendered)
            .await
            .map_err(ProxyError::Write)?;

        let status = Command::new(&self.reload_cmd[0])
            .args(&self.reload_cmd[1..])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(ProxyError::ReloadSpawn)?;

        if !status.success() {
            return Err(ProxyError::ReloadStatus(status));
        }
        Ok(())
    }
}
