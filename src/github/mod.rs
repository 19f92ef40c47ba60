//! Remote activity source.
//!
//! - `client`: `ActivitySource` trait and the reqwest-backed `GitHubClient`
//! - `cache`: short-lived cache of fetched activity with per-login single flight

pub mod cache;
pub mod client;

pub use cache::{Activity, ActivityCache};
pub use client::{ActivitySource, GitHubClient, DEFAULT_API_BASE};

use crate::error::{AppError, Result};

const MAX_LOGIN_LEN: usize = 39;

/// Checks GitHub login syntax and returns the trimmed login.
///
/// Logins are 1-39 ASCII alphanumerics or single hyphens, never leading or
/// trailing with a hyphen.
pub fn validate_login(input: &str) -> Result<String> {
    let login = input.trim();
    let invalid = || AppError::InvalidUsername(input.to_string());

    if login.is_empty() || login.len() > MAX_LOGIN_LEN {
        return Err(invalid());
    }
    if login.starts_with('-') || login.ends_with('-') || login.contains("--") {
        return Err(invalid());
    }
    if !login.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(invalid());
    }

    Ok(login.to_string())
}

#[cfg(test)]
pub mod testing {
    //! In-memory `ActivitySource` for tests.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::ActivitySource;
    use crate::error::{AppError, Result};
    use crate::models::{GitHubUser, RawEvent};

    pub fn user(login: &str) -> GitHubUser {
        GitHubUser {
            login: login.to_string(),
            id: 1,
            name: Some(format!("{login} (test)")),
            avatar_url: String::new(),
            html_url: format!("https://github.com/{login}"),
            public_repos: 3,
            followers: 0,
            following: 0,
            created_at: None,
        }
    }

    #[derive(Default)]
    pub struct FakeSource {
        users: HashMap<String, (GitHubUser, Vec<RawEvent>)>,
        failure: Option<AppError>,
        delay: Duration,
        profile_calls: AtomicUsize,
    }

    impl FakeSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_user(mut self, login: &str, events: Vec<RawEvent>) -> Self {
            self.users
                .insert(login.to_ascii_lowercase(), (user(login), events));
            self
        }

        pub fn failing(error: AppError) -> Self {
            Self {
                failure: Some(error),
                ..Self::default()
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn profile_calls(&self) -> usize {
            self.profile_calls.load(Ordering::SeqCst)
        }

        fn lookup(&self, login: &str) -> Result<&(GitHubUser, Vec<RawEvent>)> {
            if let Some(error) = &self.failure {
                return Err(error.clone());
            }
            self.users
                .get(&login.to_ascii_lowercase())
                .ok_or_else(|| AppError::NotFound(login.to_string()))
        }
    }

    #[async_trait]
    impl ActivitySource for FakeSource {
        async fn fetch_profile(&self, login: &str) -> Result<GitHubUser> {
            self.profile_calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.lookup(login).map(|(user, _)| user.clone())
        }

        async fn fetch_events(&self, login: &str) -> Result<Vec<RawEvent>> {
            self.lookup(login).map(|(_, events)| events.clone())
        }
    }
}
