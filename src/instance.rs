//! Bookkeeping for the single server instance allowed per machine.
//!
//! A running server records itself in a small JSON file under the temp
//! directory. `status`, `kill` and a second `gitgotchi` launch read it back. A
//! record whose process has exited counts as no record and is removed.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub pid: u32,
    pub port: u16,
    pub api_base: String,
    pub started_at: DateTime<Utc>,
}

impl InstanceRecord {
    /// Record for this process serving on `port`.
    pub fn current(port: u16, api_base: &str) -> Self {
        Self {
            pid: std::process::id(),
            port,
            api_base: api_base.to_string(),
            started_at: Utc::now(),
        }
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }
}

#[derive(Debug, Clone)]
pub struct InstanceFile {
    path: PathBuf,
}

impl InstanceFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn default_path() -> PathBuf {
        std::env::temp_dir().join("gitgotchi.instance.json")
    }

    pub fn record(&self, record: &InstanceRecord) -> anyhow::Result<()> {
        fs::write(&self.path, serde_json::to_vec(record)?)?;
        Ok(())
    }

    pub fn forget(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Could not remove {}: {}", self.path.display(), e);
            }
        }
    }

    /// The recorded instance if its process is still alive. Stale records
    /// are deleted on the way.
    pub fn live(&self) -> Option<InstanceRecord> {
        let record = self.read()?;
        if process_alive(record.pid) {
            return Some(record);
        }
        tracing::debug!(pid = record.pid, "Removing stale instance record");
        self.forget();
        None
    }

    fn read(&self) -> Option<InstanceRecord> {
        let bytes = fs::read(&self.path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

#[cfg(unix)]
fn send_signal(pid: u32, signal: libc::c_int) -> bool {
    // pid 0 and negative pids address process groups
    match i32::try_from(pid) {
        Ok(pid) if pid > 0 => unsafe { libc::kill(pid, signal) == 0 },
        _ => false,
    }
}

#[cfg(unix)]
pub fn process_alive(pid: u32) -> bool {
    send_signal(pid, 0)
}

#[cfg(unix)]
pub fn terminate(pid: u32) -> bool {
    send_signal(pid, libc::SIGTERM)
}

#[cfg(windows)]
pub fn process_alive(pid: u32) -> bool {
    std::process::Command::new("tasklist")
        .args(["/NH", "/FI", &format!("PID eq {pid}")])
        .output()
        .map(|out| String::from_utf8_lossy(&out.stdout).contains(&pid.to_string()))
        .unwrap_or(false)
}

#[cfg(windows)]
pub fn terminate(pid: u32) -> bool {
    std::process::Command::new("taskkill")
        .args(["/F", "/PID", &pid.to_string()])
        .status()
        .is_ok_and(|status| status.success())
}
