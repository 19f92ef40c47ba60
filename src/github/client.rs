//! GitHub REST client.
//!
//! Two unauthenticated calls per user:
//! - GET {base}/users/{login}
//! - GET {base}/users/{login}/events?per_page=100
//!
//! Failures are classified into `NotFound`, `RateLimited` and `Transport`.
//! Nothing is retried here; the caller decides.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, ACCEPT, RETRY_AFTER};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{GitHubUser, RawEvent};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("gitgotchi/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const EVENTS_PER_PAGE: u32 = 100;
const RATELIMIT_RESET: &str = "x-ratelimit-reset";

/// Where user profiles and public events come from.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    async fn fetch_profile(&self, login: &str) -> Result<GitHubUser>;
    async fn fetch_events(&self, login: &str) -> Result<Vec<RawEvent>>;
}

pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
}

impl GitHubClient {
    pub fn new(api_base: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Internal(format!("HTTP client setup failed: {e}")))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, login: &str) -> Result<T> {
        let response = self
            .http
            .get(url)
            .header(ACCEPT, GITHUB_ACCEPT)
            .send()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, url, "GitHub request failed");
            return Err(classify_failure(
                status,
                response.headers(),
                login,
                Utc::now().timestamp(),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Transport(format!("read body failed: {e}")))?;
        serde_json::from_slice(&body)
            .map_err(|e| AppError::Transport(format!("malformed response from {url}: {e}")))
    }
}

#[async_trait]
impl ActivitySource for GitHubClient {
    async fn fetch_profile(&self, login: &str) -> Result<GitHubUser> {
        let url = format!("{}/users/{}", self.api_base, login);
        self.get_json(&url, login).await
    }

    async fn fetch_events(&self, login: &str) -> Result<Vec<RawEvent>> {
        let url = format!(
            "{}/users/{}/events?per_page={}",
            self.api_base, login, EVENTS_PER_PAGE
        );
        let wire: Vec<WireEvent> = self.get_json(&url, login).await?;
        Ok(into_raw_events(wire))
    }
}

/// Maps a non-success response onto the error taxonomy.
///
/// Any 403 or 429 counts as throttling. The wait comes from `Retry-After`
/// when present, else from `x-ratelimit-reset` relative to `now_epoch`.
pub fn classify_failure(
    status: StatusCode,
    headers: &HeaderMap,
    login: &str,
    now_epoch: i64,
) -> AppError {
    match status {
        StatusCode::NOT_FOUND => AppError::NotFound(login.to_string()),
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => AppError::RateLimited {
            retry_after: retry_after(headers, now_epoch),
        },
        other => AppError::Transport(format!(
            "unexpected status {} for '{}'",
            other, login
        )),
    }
}

/// `Retry-After` may be delay-seconds or an HTTP-date.
fn retry_after(headers: &HeaderMap, now_epoch: i64) -> Option<Duration> {
    let header_text = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
    };
    let wait_until = |epoch: i64| Duration::from_secs((epoch - now_epoch).max(0) as u64);

    if let Some(value) = header_text(RETRY_AFTER.as_str()) {
        if let Ok(secs) = value.parse::<i64>() {
            return Some(Duration::from_secs(secs.max(0) as u64));
        }
        if let Ok(date) = DateTime::parse_from_rfc2822(value) {
            return Some(wait_until(date.timestamp()));
        }
        tracing::debug!(value, "Ignoring unparseable Retry-After");
    }
    header_text(RATELIMIT_RESET)
        .and_then(|v| v.parse::<i64>().ok())
        .map(wait_until)
}

/// Event as it appears on the wire. Everything but the type and time is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct WireEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    created_at: Option<WireTimestamp>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireTimestamp {
    Epoch(i64),
    Text(String),
}

impl WireTimestamp {
    fn parse(&self) -> Option<DateTime<Utc>> {
        match self {
            WireTimestamp::Epoch(secs) => DateTime::from_timestamp(*secs, 0),
            WireTimestamp::Text(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

/// Drops events without a usable timestamp; the rest pass through in order.
pub(crate) fn into_raw_events(wire: Vec<WireEvent>) -> Vec<RawEvent> {
    let total = wire.len();
    let events: Vec<RawEvent> = wire
        .into_iter()
        .filter_map(|event| match event.created_at.as_ref().and_then(WireTimestamp::parse) {
            Some(created_at) => Some(RawEvent::new(event.kind, created_at)),
            None => {
                tracing::warn!(kind = %event.kind, raw = ?event.created_at, "Skipping event with malformed timestamp");
                None
            }
        })
        .collect();

    if events.len() < total {
        tracing::debug!("Kept {} of {} events", events.len(), total);
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn not_found_is_classified() {
        let err = classify_failure(StatusCode::NOT_FOUND, &HeaderMap::new(), "ghost", 0);
        assert_eq!(err, AppError::NotFound("ghost".into()));
    }

    #[test]
    fn forbidden_uses_ratelimit_reset() {
        let h = headers(&[("x-ratelimit-remaining", "0"), ("x-ratelimit-reset", "1000")]);
        let err = classify_failure(StatusCode::FORBIDDEN, &h, "octocat", 940);
        assert_eq!(
            err,
            AppError::RateLimited {
                retry_after: Some(Duration::from_secs(60))
            }
        );
    }

    #[test]
    fn retry_after_header_wins() {
        let h = headers(&[("retry-after", "17"), ("x-ratelimit-reset", "5000")]);
        let err = classify_failure(StatusCode::TOO_MANY_REQUESTS, &h, "octocat", 0);
        assert_eq!(
            err,
            AppError::RateLimited {
                retry_after: Some(Duration::from_secs(17))
            }
        );
    }

    #[test]
    fn retry_after_accepts_http_date() {
        let h = headers(&[
            ("retry-after", "Wed, 21 Oct 2015 07:28:00 GMT"),
            ("x-ratelimit-reset", "5000"),
        ]);
        // 90 seconds before the date above
        let err = classify_failure(StatusCode::TOO_MANY_REQUESTS, &h, "octocat", 1_445_412_390);
        assert_eq!(
            err,
            AppError::RateLimited {
                retry_after: Some(Duration::from_secs(90))
            }
        );
    }

    #[test]
    fn garbled_retry_after_falls_back_to_reset() {
        let h = headers(&[("retry-after", "soon"), ("x-ratelimit-reset", "1000")]);
        let err = classify_failure(StatusCode::FORBIDDEN, &h, "octocat", 990);
        assert_eq!(
            err,
            AppError::RateLimited {
                retry_after: Some(Duration::from_secs(10))
            }
        );
    }

    #[test]
    fn reset_in_the_past_means_no_wait() {
        let h = headers(&[("x-ratelimit-reset", "10")]);
        let err = classify_failure(StatusCode::FORBIDDEN, &h, "octocat", 20);
        assert_eq!(
            err,
            AppError::RateLimited {
                retry_after: Some(Duration::ZERO)
            }
        );
    }

    #[test]
    fn throttling_without_headers_has_no_estimate() {
        let err = classify_failure(StatusCode::FORBIDDEN, &HeaderMap::new(), "octocat", 0);
        assert_eq!(err, AppError::RateLimited { retry_after: None });
    }

    #[test]
    fn other_statuses_are_transport_errors() {
        let err = classify_failure(StatusCode::BAD_GATEWAY, &HeaderMap::new(), "octocat", 0);
        assert!(matches!(err, AppError::Transport(_)));
    }

    #[test]
    fn wire_events_accept_text_and_epoch_timestamps() {
        let body = r#"[
            {"id": "1", "type": "PushEvent", "created_at": "2024-06-15T10:00:00Z", "payload": {}},
            {"id": "2", "type": "WatchEvent", "created_at": 1718445600},
            {"id": "3", "type": "PushEvent", "created_at": "yesterday-ish"},
            {"id": "4", "type": "PushEvent", "created_at": null},
            {"id": "5", "type": "PushEvent"}
        ]"#;
        let wire: Vec<WireEvent> = serde_json::from_str(body).unwrap();
        let events = into_raw_events(wire);

        assert_eq!(events.len(), 2);
        assert!(events[0].is_push());
        assert_eq!(events[0].created_at, "2024-06-15T10:00:00Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(events[1].kind, "WatchEvent");
        assert_eq!(events[1].created_at.timestamp(), 1718445600);
    }

    #[test]
    fn profile_deserializes_from_github_shape() {
        let body = r#"{
            "login": "octocat", "id": 583231, "name": null,
            "avatar_url": "https://avatars.githubusercontent.com/u/583231",
            "html_url": "https://github.com/octocat",
            "public_repos": 8, "followers": 9000, "following": 9,
            "created_at": "2011-01-25T18:44:36Z", "type": "User"
        }"#;
        let user: GitHubUser = serde_json::from_str(body).unwrap();
        assert_eq!(user.login, "octocat");
        assert_eq!(user.display_name(), "octocat");
        assert_eq!(user.public_repos, 8);
    }

    #[test]
    fn api_base_drops_trailing_slash() {
        let client = GitHubClient::new("http://localhost:9999/").unwrap();
        assert_eq!(client.api_base(), "http://localhost:9999");
    }
}
