//! Garden orchestration: fetch activity, derive stats and health, package a
//! snapshot for the frontend.
//!
//! Used by: `GET /api/v1/garden/{login}` and the `check` subcommand.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone};
use rand::Rng;

use crate::activity::{derive_stats, evaluate_health, format_relative_time, mood_message, Clock};
use crate::error::Result;
use crate::github::{validate_login, Activity, ActivityCache, ActivitySource};
use crate::models::{GardenSnapshot, ServiceStatus};

pub struct GardenService {
    source: Arc<dyn ActivitySource>,
    cache: ActivityCache,
    clock: Clock,
}

pub type SharedGarden = Arc<GardenService>;

impl GardenService {
    pub fn new(source: Arc<dyn ActivitySource>, cache_ttl: Duration, clock: Clock) -> Self {
        Self {
            source,
            cache: ActivityCache::new(cache_ttl),
            clock,
        }
    }

    /// Builds a fresh snapshot for `login`. Activity may come from the cache
    /// unless `refresh` is set; stats and health are always recomputed.
    pub async fn snapshot(&self, login: &str, refresh: bool) -> Result<GardenSnapshot> {
        let login = validate_login(login)?;
        let activity = self
            .cache
            .get_or_fetch(self.source.as_ref(), &login, refresh)
            .await?;

        let snapshot = {
            let mut rng = rand::thread_rng();
            match self.clock {
                Clock::Local => build_snapshot(&activity, chrono::Local::now(), &mut rng),
                Clock::Utc => build_snapshot(&activity, chrono::Utc::now(), &mut rng),
                Clock::Fixed(at) => build_snapshot(&activity, at, &mut rng),
            }
        };

        tracing::info!(
            login = %snapshot.user.login,
            commits = snapshot.stats.total_commits,
            streak = snapshot.stats.current_streak,
            health = snapshot.health.current,
            state = snapshot.health.state.as_str(),
            "Garden evaluated"
        );
        Ok(snapshot)
    }

    pub fn status(&self) -> ServiceStatus {
        ServiceStatus {
            version: env!("CARGO_PKG_VERSION").to_string(),
            day_boundary: self.clock.day_boundary().to_string(),
            cache: self.cache.stats(),
        }
    }
}

/// Runs the derivation pipeline over already-fetched activity. Days are
/// bucketed in the time zone of `now`.
pub fn build_snapshot<Tz: TimeZone, R: Rng + ?Sized>(
    activity: &Activity,
    now: DateTime<Tz>,
    rng: &mut R,
) -> GardenSnapshot {
    let stats = derive_stats(&activity.events, now.clone());
    let health = evaluate_health(&stats.commit_history, now.clone());
    let message = mood_message(&health, stats.current_streak, rng).to_string();
    let last_commit_relative = stats
        .last_commit_date
        .as_ref()
        .map(|last| format_relative_time(last, &now));

    GardenSnapshot {
        user: activity.user.clone(),
        stats,
        health,
        message,
        last_commit_relative,
        evaluated_at: now.fixed_offset(),
    }
}
