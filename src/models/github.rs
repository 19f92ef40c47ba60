use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event type that counts as commit activity.
pub const PUSH_EVENT: &str = "PushEvent";

/// Public profile of a GitHub user, as returned by `GET /users/{login}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitHubUser {
    pub login: String,
    pub id: u64,
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    pub created_at: Option<DateTime<Utc>>,
}

impl GitHubUser {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.login)
    }
}

/// One public activity record. Only `kind` and `created_at` are used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

impl RawEvent {
    pub fn new(kind: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            kind: kind.into(),
            created_at,
        }
    }

    #[cfg(test)]
    pub fn push(created_at: DateTime<Utc>) -> Self {
        Self::new(PUSH_EVENT, created_at)
    }

    pub fn is_push(&self) -> bool {
        self.kind == PUSH_EVENT
    }
}
