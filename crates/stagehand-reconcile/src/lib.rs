//! stagehand-reconcile — the control loop tying prober and configurator
//! together.
//!
//! One cycle probes the static fleet and hands the resulting healthy set
//! straight to the proxy configurator. The set is a plain return value:
//! the loop is its sole owner, so there is no shared healthy-set state
//! and no reader can ever observe a partial replacement.
//!
//! Scheduling is fixed-delay: the next cycle starts a full interval after
//! the previous one finished, success or failure, so cycles are strictly
//! sequential and never overlap (`run_cycle` takes `&mut self`). Both
//! steps absorb their own failures; a cycle can degrade but never abort
//! the loop.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info};

use stage_core::{HealthySet, Settings, WorkerDescriptor};
use stagehand_health::{AuditLog, probe_fleet};
use stagehand_proxy::ProxyConfigurator;

/// The periodic probe-then-reconfigure loop.
pub struct Reconciler {
    fleet: Vec<WorkerDescriptor>,
    probe_timeout: Duration,
    audit: AuditLog,
    configurator: ProxyConfigurator,
}

impl Reconciler {
    /// Create a reconciler over a fixed fleet.
    pub fn new(
        fleet: Vec<WorkerDescriptor>,
        probe_timeout: Duration,
        audit: AuditLog,
        configurator: ProxyConfigurator,
    ) -> Self {
        Self {
            fleet,
            probe_timeout,
            audit,
            configurator,
        }
    }

    /// Assemble a reconciler from runtime settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.worker_fleet(),
            settings.probe_timeout,
            AuditLog::new(&settings.audit_log_path),
            ProxyConfigurator::new(
                &settings.proxy_config_path,
                settings.proxy_reload_cmd.clone(),
            ),
        )
    }

    /// Run one reconciliation cycle and return the healthy set it saw.
    pub async fn run_cycle(&mut self) -> HealthySet {
        debug!(fleet = self.fleet.len(), "running reconciliation cycle");
        let healthy = probe_fleet(&self.fleet, self.probe_timeout, &self.audit).await;
        self.configurator.apply(&healthy).await;
        healthy
    }

    /// Run cycles forever with a fixed delay between completions.
    ///
    /// The first cycle runs immediately so the proxy config reflects the
    /// fleet as soon as the daemon is up; each subsequent cycle starts a
    /// full interval after the previous one finished. The shutdown
    /// receiver exists for graceful daemon termination; in normal
    /// operation the loop runs for the process lifetime.
    pub async fn run(&mut self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = interval.as_secs(),
            fleet = self.fleet.len(),
            "reconciliation loop started"
        );

        loop {
            let healthy = self.run_cycle().await;
            debug!(healthy = healthy.len(), "reconciliation cycle complete");

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = shutdown.changed() => {
                    info!("reconciliation loop shutting down");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn spawn_ok_stub() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut sock, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    let _ = sock.read(&mut buf).await;
                    let _ = sock
                        .write_all(
                            b"HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok",
                        )
                        .await;
                });
            }
        });
        addr.to_string()
    }

    fn worker_at(name: &str, addr: &str) -> WorkerDescriptor {
        WorkerDescriptor {
            name: name.to_string(),
            health_url: format!("http://{addr}/admin/api/health"),
        }
    }

    #[tokio::test]
    async fn cycle_reconciles_config_to_responsive_workers() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("upstream.conf");
        let ok_addr = spawn_ok_stub().await;

        let mut reconciler = Reconciler::new(
            vec![
                worker_at("alive", &ok_addr),
                worker_at("dead", "127.0.0.1:1"),
            ],
            Duration::from_millis(500),
            AuditLog::new(dir.path().join("error.log")),
            ProxyConfigurator::new(&config, vec!["true".to_string()]),
        );

        let healthy = reconciler.run_cycle().await;
        assert_eq!(healthy.len(), 1);
        assert_eq!(healthy[0].name, "alive");

        let written = std::fs::read_to_string(&config).unwrap();
        assert!(written.contains("server alive:8080"));
        assert!(!written.contains("dead"));
    }

    #[tokio::test]
    async fn repeated_cycle_with_stable_set_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("upstream.conf");
        let marker = dir.path().join("reloads");
        let ok_addr = spawn_ok_stub().await;

        let mut reconciler = Reconciler::new(
            vec![worker_at("alive", &ok_addr)],
            Duration::from_millis(500),
            AuditLog::new(dir.path().join("error.log")),
            ProxyConfigurator::new(
                &config,
                vec![
                    "sh".to_string(),
                    "-c".to_string(),
                    format!("echo reload >> {}", marker.display()),
                ],
            ),
        );

        reconciler.run_cycle().await;
        std::fs::remove_file(&config).unwrap();
        reconciler.run_cycle().await;

        // Second cycle saw the same set: zero writes, zero reloads.
        assert!(!config.exists());
        assert_eq!(std::fs::read_to_string(&marker).unwrap().lines().count(), 1);
    }

    #[tokio::test]
    async fn first_cycle_runs_before_the_first_interval() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("upstream.conf");

        let mut reconciler = Reconciler::new(
            vec![],
            Duration::from_millis(100),
            AuditLog::new(dir.path().join("error.log")),
            ProxyConfigurator::new(&config, vec!["true".to_string()]),
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            // An interval far longer than the test: only an immediate
            // first cycle can have written the config.
            reconciler.run(Duration::from_secs(3600), shutdown_rx).await;
        });

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(config.exists(), "config must be written at startup");

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn loop_runs_until_shutdown_and_stays_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("upstream.conf");
        let marker = dir.path().join("reloads");

        // Empty fleet: every cycle renders the same empty block.
        let mut reconciler = Reconciler::new(
            vec![],
            Duration::from_millis(100),
            AuditLog::new(dir.path().join("error.log")),
            ProxyConfigurator::new(
                &config,
                vec![
                    "sh".to_string(),
                    "-c".to_string(),
                    format!("echo reload >> {}", marker.display()),
                ],
            ),
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            reconciler.run(Duration::from_millis(10), shutdown_rx).await;
        });

        tokio::time::sleep(Duration::from_millis(120)).await;
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        // Several cycles ran, but only the first one applied anything.
        assert!(config.exists());
        assert_eq!(std::fs::read_to_string(&marker).unwrap().lines().count(), 1);
    }
}
