//! Append-only probe failure audit log.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::error;

/// Records connection-level probe failures, one line per failure.
///
/// Line format: `[<epoch secs>] <worker>: error`. Writes are best-effort;
/// an unwritable log is reported and otherwise ignored so the prober is
/// never blocked by its own bookkeeping.
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    /// Create a logger appending to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append a failure line for `worker`.
    pub fn append(&self, worker: &str) {
        if let Err(e) = self.try_append(worker) {
            error!(error = %e, path = ?self.path, "failed to write audit log");
        }
    }

    fn try_append(&self, worker: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "[{}] {worker}: error", epoch_secs())
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_creates_file_and_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("error.log");
        let audit = AuditLog::new(&path);

        audit.append("worker-a");
        audit.append("worker-b");

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("worker-a: error"));
        assert!(lines[1].ends_with("worker-b: error"));
    }

    #[test]
    fn append_is_append_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("error.log");
        let audit = AuditLog::new(&path);

        audit.append("w");
        let first = std::fs::read_to_string(&path).unwrap();
        audit.append("w");
        let second = std::fs::read_to_string(&path).unwrap();
        assert!(second.starts_with(&first));
        assert!(second.len() > first.len());
    }

    #[test]
    fn unwritable_path_does_not_panic() {
        // A directory cannot be opened for appending.
        let dir = tempfile::tempdir().unwrap();
        let audit = AuditLog::new(dir.path());
        audit.append("w");
    }
}
