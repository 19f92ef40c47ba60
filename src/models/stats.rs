use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Commit statistics over the trailing 30-day window.
///
/// `commit_history` is newest first; its length is `total_commits` and its
/// head is `last_commit_date`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitStats {
    pub total_commits: usize,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_commit_date: Option<DateTime<Utc>>,
    pub commit_history: Vec<DateTime<Utc>>,
}
