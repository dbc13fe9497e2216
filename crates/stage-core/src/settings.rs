//! Environment-sourced runtime settings.
//!
//! Both daemon roles read the same `STAGEHAND_*` variables; each uses the
//! subset it needs. Every knob has a default matching the shipped compose
//! topology, so an empty environment yields a working single-host setup.
//! Parse failures are fatal — misconfiguration must not start a daemon
//! that silently does the wrong thing.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};
use crate::types::WorkerDescriptor;

/// Runtime configuration for both daemon roles.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Names of the worker fleet, in probe order.
    pub worker_names: Vec<String>,
    /// Path of the rendered reverse-proxy upstream config.
    pub proxy_config_path: PathBuf,
    /// Command (argv) that reloads the running proxy.
    pub proxy_reload_cmd: Vec<String>,
    /// Delay between reconciliation cycle completions.
    pub reconcile_interval: Duration,
    /// Per-worker health probe timeout.
    pub probe_timeout: Duration,
    /// Ticket lifetime in the ticket store.
    pub ticket_ttl: Duration,
    /// The single host the cue relay may forward to.
    pub allowed_cue_host: String,
    /// The orchestrator's privileged health-check endpoint.
    pub orchestrator_url: String,
    /// Timeout for cue relay and diagnostics forwards.
    pub cue_timeout: Duration,
    /// Timeout for the privileged health-check fetch.
    pub health_check_timeout: Duration,
    /// Payload disclosed by the privileged endpoint on fetch failure.
    pub secret: String,
    /// Append-only probe failure audit log.
    pub audit_log_path: PathBuf,
}

/// Name of the session cookie carrying the ticket.
pub const TICKET_COOKIE: &str = "ticket";

impl Settings {
    /// Load settings from the environment, falling back to defaults.
    pub fn from_env() -> CoreResult<Self> {
        Ok(Self {
            worker_names: env_list("STAGEHAND_WORKERS", &["worker-a", "worker-b"]),
            proxy_config_path: PathBuf::from(env_or(
                "STAGEHAND_PROXY_CONFIG",
                "/etc/nginx/conf.d/dynamic_upstream.conf",
            )),
            proxy_reload_cmd: env_argv(
                "STAGEHAND_PROXY_RELOAD_CMD",
                &["docker", "exec", "nginx", "nginx", "-s", "reload"],
            )?,
            reconcile_interval: env_secs("STAGEHAND_RECONCILE_INTERVAL_SECS", 15)?,
            probe_timeout: env_secs("STAGEHAND_PROBE_TIMEOUT_SECS", 5)?,
            ticket_ttl: env_secs("STAGEHAND_TICKET_TTL_SECS", 300)?,
            allowed_cue_host: env_or("STAGEHAND_ALLOWED_CUE_HOST", "nginx"),
            orchestrator_url: env_or(
                "STAGEHAND_ORCHESTRATOR_URL",
                "http://orchestrator:8080/admin/health-check",
            ),
            cue_timeout: env_secs("STAGEHAND_CUE_TIMEOUT_SECS", 5)?,
            health_check_timeout: env_secs("STAGEHAND_HEALTH_CHECK_TIMEOUT_SECS", 5)?,
            secret: env_or("STAGEHAND_SECRET", "[**REDACTED**]"),
            audit_log_path: PathBuf::from(env_or("STAGEHAND_AUDIT_LOG", "logs/error.log")),
        })
    }

    /// The static worker fleet, in probe order.
    pub fn worker_fleet(&self) -> Vec<WorkerDescriptor> {
        self.worker_names
            .iter()
            .map(|name| WorkerDescriptor::for_name(name))
            .collect()
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_secs(key: &str, default: u64) -> CoreResult<Duration> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| CoreError::Config(format!("{key} must be an integer, got `{raw}`"))),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

fn env_list(key: &str, default: &[&str]) -> Vec<String> {
    match env::var(key) {
        Ok(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Err(_) => default.iter().map(|s| s.to_string()).collect(),
    }
}

fn env_argv(key: &str, default: &[&str]) -> CoreResult<Vec<String>> {
    let argv: Vec<String> = match env::var(key) {
        Ok(raw) => raw.split_whitespace().map(str::to_string).collect(),
        Err(_) => default.iter().map(|s| s.to_string()).collect(),
    };
    if argv.is_empty() {
        return Err(CoreError::Config(format!("{key} must not be empty")));
    }
    Ok(argv)
}
