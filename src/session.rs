//! Last-used login, kept across server restarts.
//!
//! Stored as a small JSON file next to the PID file. A missing or unreadable
//! file reads as "no session".

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::SessionInfo;

#[derive(Debug, Serialize, Deserialize)]
struct SavedSession {
    login: String,
    saved_at: DateTime<Utc>,
}

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn default_path() -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push("gitgotchi-session.json");
        path
    }

    pub fn load(&self) -> SessionInfo {
        match self.read() {
            Some(saved) => SessionInfo {
                login: Some(saved.login),
                saved_at: Some(saved.saved_at),
            },
            None => SessionInfo {
                login: None,
                saved_at: None,
            },
        }
    }

    /// Persists `login`; callers validate it first.
    pub fn save(&self, login: &str) -> Result<SessionInfo> {
        let saved = SavedSession {
            login: login.to_string(),
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string(&saved)
            .map_err(|e| AppError::Internal(format!("Failed to encode session: {e}")))?;
        fs::write(&self.path, json)
            .map_err(|e| AppError::Internal(format!("Failed to write session file: {e}")))?;

        tracing::debug!("Saved session for {} to {}", saved.login, self.path.display());
        Ok(SessionInfo {
            login: Some(saved.login),
            saved_at: Some(saved.saved_at),
        })
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Internal(format!(
                "Failed to remove session file: {e}"
            ))),
        }
    }

    fn read(&self) -> Option<SavedSession> {
        let contents = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(saved) => Some(saved),
            Err(e) => {
                tracing::warn!("Ignoring corrupt session file {}: {}", self.path.display(), e);
                None
            }
        }
    }
}
