//! Health check probe logic.
//!
//! One TCP connection and one HTTP/1.1 request per worker per cycle.
//! A worker is healthy iff its endpoint answers 2xx within the timeout.

use std::time::Duration;

use tracing::{debug, warn};

use stage_core::{HealthySet, WorkerDescriptor};

use crate::audit::AuditLog;

/// Result of a single health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeResult {
    /// The health endpoint returned 2xx.
    Healthy,
    /// The worker responded, but with a non-2xx status.
    Unhealthy,
    /// The probe could not complete (connection error or timeout).
    Failed,
}

/// Probe the whole fleet and return the healthy subset, in input order.
///
/// Never returns an error: unreachable and unhealthy workers are simply
/// excluded. Connection-level failures (`Failed`) get an audit line in
/// addition to the log event; responsive-but-unhealthy workers do not.
pub async fn probe_fleet(
    workers: &[WorkerDescriptor],
    timeout: Duration,
    audit: &AuditLog,
) -> HealthySet {
    let mut healthy = Vec::new();

    for worker in workers {
        match probe_worker(worker, timeout).await {
            ProbeResult::Healthy => healthy.push(worker.clone()),
            ProbeResult::Unhealthy => {
                warn!(worker = %worker.name, "worker reported unhealthy status");
            }
            ProbeResult::Failed => {
                warn!(worker = %worker.name, "health check failed, assuming unhealthy");
                audit.append(&worker.name);
            }
        }
    }

    debug!(
        healthy = healthy.len(),
        total = workers.len(),
        "fleet probe complete"
    );
    healthy
}

/// Perform one HTTP health probe against a worker.
///
/// Returns `Healthy` for 2xx, `Unhealthy` for any other status, and
/// `Failed` when the connection cannot be established or the whole
/// exchange does not finish within `timeout`.
pub async fn probe_worker(worker: &WorkerDescriptor, timeout: Duration) -> ProbeResult {
    let Some((authority, path)) = split_health_url(&worker.health_url) else {
        warn!(worker = %worker.name, url = %worker.health_url, "unparsable health url");
        return ProbeResult::Failed;
    };
    let uri = &worker.health_url;

    let result = tokio::time::timeout(timeout, async {
        let stream = match tokio::net::TcpStream::connect(authority).await {
            Ok(s) => s,
            Err(e) => {
                debug!(error = %e, %uri, "health probe connection failed");
                return ProbeResult::Failed;
            }
        };

        let io = hyper_util::rt::TokioIo::new(stream);
        let (mut sender, conn) = match hyper::client::conn::http1::handshake(io).await {
            Ok(pair) => pair,
            Err(e) => {
                debug!(error = %e, %uri, "health probe handshake failed");
                return ProbeResult::Failed;
            }
        };

        // Drive the connection in the background.
        tokio::spawn(async move {
            let _ = conn.await;
        });

        let req = http::Request::builder()
            .method("GET")
            .uri(path)
            .header("host", authority)
            .header("user-agent", "stagehand-health/0.1")
            .body(http_body_util::Empty::<bytes::Bytes>::new())
            .unwrap();

        match sender.send_request(req).await {
            Ok(resp) => {
                if resp.status().is_success() {
                    ProbeResult::Healthy
                } else {
                    debug!(status = %resp.status(), %uri, "health probe non-2xx");
                    ProbeResult::Unhealthy
                }
            }
            Err(e) => {
                debug!(error = %e, %uri, "health probe request failed");
                ProbeResult::Failed
            }
        }
    })
    .await;

    match result {
        Ok(probe) => probe,
        Err(_) => {
            debug!(%uri, "health probe timed out");
            ProbeResult::Failed
        }
    }
}

/// Split an `http://host:port/path` health URL into authority and path.
fn split_health_url(url: &str) -> Option<(&str, &str)> {
    let rest = url.strip_prefix("http://")?;
    if rest.is_empty() {
        return None;
    }
    match rest.find('/') {
        Some(i) => Some((&rest[..i], &rest[i..])),
        None => Some((rest, "/")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    /// Minimal one-shot HTTP stub: answers every connection with `response`.
    async fn spawn_stub(response: &'static str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut sock, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    let _ = sock.read(&mut buf).await;
                    let _ = sock.write_all(response.as_bytes()).await;
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

    const OK: &str = "HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok";
    const SERVER_ERROR: &str =
        "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n";

    #[test]
    fn split_health_url_variants() {
        assert_eq!(
            split_health_url("http://worker-a:8080/admin/api/health"),
            Some(("worker-a:8080", "/admin/api/health"))
        );
        assert_eq!(split_health_url("http://h:1"), Some(("h:1", "/")));
        assert_eq!(split_health_url("https://h:1/x"), None);
        assert_eq!(split_health_url("worker-a:8080"), None);
    }

    #[tokio::test]
    async fn probe_2xx_is_healthy() {
        let addr = spawn_stub(OK).await;
        let result = probe_worker(&worker_at("w", &addr), Duration::from_secs(1)).await;
        assert_eq!(result, ProbeResult::Healthy);
    }

    #[tokio::test]
    async fn probe_non_2xx_is_unhealthy() {
        let addr = spawn_stub(SERVER_ERROR).await;
        let result = probe_worker(&worker_at("w", &addr), Duration::from_secs(1)).await;
        assert_eq!(result, ProbeResult::Unhealthy);
    }

    #[tokio::test]
    async fn probe_to_closed_port_fails() {
        let result = probe_worker(&worker_at("w", "127.0.0.1:1"), Duration::from_millis(200)).await;
        assert_eq!(result, ProbeResult::Failed);
    }

    #[tokio::test]
    async fn probe_times_out_on_silent_server() {
        // Accepts the connection but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            while let Ok((sock, _)) = listener.accept().await {
                // Hold the socket open without responding.
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    drop(sock);
                });
            }
        });

        let result = probe_worker(&worker_at("w", &addr), Duration::from_millis(100)).await;
        assert_eq!(result, ProbeResult::Failed);
    }

    #[tokio::test]
    async fn fleet_probe_keeps_only_responsive_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let audit = AuditLog::new(dir.path().join("error.log"));

        let ok_addr = spawn_stub(OK).await;
        let workers = vec![
            worker_at("dead", "127.0.0.1:1"),
            worker_at("alive", &ok_addr),
        ];

        let healthy = probe_fleet(&workers, Duration::from_millis(500), &audit).await;
        let names: Vec<&str> = healthy.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["alive"]);

        // The connection failure, and only it, hit the audit log.
        let log = std::fs::read_to_string(dir.path().join("error.log")).unwrap();
        assert!(log.contains("dead: error"));
        assert!(!log.contains("alive"));
    }

    #[tokio::test]
    async fn fleet_probe_excludes_unhealthy_without_audit() {
        let dir = tempfile::tempdir().unwrap();
        let audit = AuditLog::new(dir.path().join("error.log"));

        let bad_addr = spawn_stub(SERVER_ERROR).await;
        let workers = vec![worker_at("sick", &bad_addr)];

        let healthy = probe_fleet(&workers, Duration::from_millis(500), &audit).await;
        assert!(healthy.is_empty());
        // Non-2xx results are logged but not audited.
        assert!(!dir.path().join("error.log").exists());
    }
}
