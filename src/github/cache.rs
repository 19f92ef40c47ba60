//! Activity cache for repeated garden queries.
//!
//! Holds the raw profile and event list per login for a short TTL so that
//! page reloads do not burn the unauthenticated rate limit. Derived stats are
//! never cached; callers recompute them with a fresh `now`.
//!
//! Fetches are single-flight per login: concurrent requests for the same user
//! wait on one lock, and whoever arrives while a fetch is running reuses its
//! outcome, success or failure, even when asking for a refresh. Failures are
//! only shared with requests that were already waiting; later requests fetch
//! again.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::error::{AppError, Result};
use crate::github::ActivitySource;
use crate::models::{CacheStatus, GitHubUser, RawEvent};

/// Everything fetched for one user.
#[derive(Debug, Clone)]
pub struct Activity {
    pub user: GitHubUser,
    pub events: Vec<RawEvent>,
}

#[derive(Debug, Clone)]
struct CachedActivity {
    outcome: Result<Arc<Activity>>,
    fetched_at: Instant,
}

type FetchGate = Arc<tokio::sync::Mutex<()>>;

pub struct ActivityCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CachedActivity>>,
    fetch_locks: Mutex<HashMap<String, FetchGate>>,
}

impl ActivityCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
            fetch_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns cached activity for `login`, fetching it when missing, stale
    /// or when `refresh` is set.
    pub async fn get_or_fetch(
        &self,
        source: &dyn ActivitySource,
        login: &str,
        refresh: bool,
    ) -> Result<Arc<Activity>> {
        let key = login.to_ascii_lowercase();
        let requested_at = Instant::now();

        let gate = self.fetch_lock(&key)?;
        let outcome = self
            .fetch_gated(&gate, source, login, &key, requested_at, refresh)
            .await;
        self.release_lock(&key, gate);
        outcome
    }

    async fn fetch_gated(
        &self,
        gate: &FetchGate,
        source: &dyn ActivitySource,
        login: &str,
        key: &str,
        requested_at: Instant,
        refresh: bool,
    ) -> Result<Arc<Activity>> {
        let _guard = gate.lock().await;

        if let Some(cached) = self.lookup(key)? {
            let joined = cached.fetched_at > requested_at;
            let fresh = cached.fetched_at.elapsed() < self.ttl;
            if joined {
                tracing::debug!(login = %key, ok = cached.outcome.is_ok(), "Joined in-flight fetch");
                return cached.outcome;
            }
            if let (Ok(activity), true, false) = (&cached.outcome, fresh, refresh) {
                tracing::debug!(login = %key, "Serving cached activity");
                return Ok(activity.clone());
            }
        }

        let start = Instant::now();
        let outcome = fetch_activity(source, login).await;
        match &outcome {
            Ok(activity) => tracing::info!(
                "Fetched activity for {}: {} events in {:?}",
                key,
                activity.events.len(),
                start.elapsed()
            ),
            Err(e) => tracing::warn!("Fetching activity for {} failed after {:?}: {}", key, start.elapsed(), e),
        }

        self.store(key.to_string(), outcome.clone())?;
        outcome
    }

    pub fn stats(&self) -> CacheStatus {
        let cached_users = self
            .entries
            .lock()
            .map(|entries| {
                entries
                    .values()
                    .filter(|c| c.outcome.is_ok() && c.fetched_at.elapsed() < self.ttl)
                    .count()
            })
            .unwrap_or(0);

        CacheStatus {
            cached_users,
            ttl_secs: self.ttl.as_secs(),
        }
    }

    fn fetch_lock(&self, key: &str) -> Result<FetchGate> {
        let mut locks = self
            .fetch_locks
            .lock()
            .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;
        Ok(locks.entry(key.to_string()).or_default().clone())
    }

    /// Drops the gate for `key` once no other request holds a handle to it.
    fn release_lock(&self, key: &str, gate: FetchGate) {
        let Ok(mut locks) = self.fetch_locks.lock() else {
            return;
        };
        // one handle in the map, one here
        if Arc::strong_count(&gate) == 2 {
            locks.remove(key);
        }
    }

    fn lookup(&self, key: &str) -> Result<Option<CachedActivity>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn store(&self, key: String, outcome: Result<Arc<Activity>>) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;
        entries.retain(|_, c| c.fetched_at.elapsed() < self.ttl);
        entries.insert(
            key,
            CachedActivity {
                outcome,
                fetched_at: Instant::now(),
            },
        );
        Ok(())
    }
}

async fn fetch_activity(source: &dyn ActivitySource, login: &str) -> Result<Arc<Activity>> {
    let user = source.fetch_profile(login).await?;
    let events = source.fetch_events(login).await?;
    Ok(Arc::new(Activity { user, events }))
}
