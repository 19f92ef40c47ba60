//! Response payloads for the garden, session and status endpoints.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use super::{CommitStats, GitHubUser, PlantHealth};

/// Everything the frontend needs to draw one user's plant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GardenSnapshot {
    pub user: GitHubUser,
    pub stats: CommitStats,
    pub health: PlantHealth,
    pub message: String,
    pub last_commit_relative: Option<String>,
    pub evaluated_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionInfo {
    pub login: Option<String>,
    pub saved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub version: String,
    pub day_boundary: String,
    pub cache: CacheStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStatus {
    pub cached_users: usize,
    pub ttl_secs: u64,
}
