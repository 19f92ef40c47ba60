use std::cmp::Ordering;

use chrono::{DateTime, TimeZone, Utc};

use super::calendar::{active_days, days_before, days_ending_today, WINDOW_DAYS};
use crate::models::{PlantHealth, PlantState, Trend, MAX_HEALTH, MIN_HEALTH};

const BASE_HEALTH: i32 = 50;
const ACTIVE_DAY_BONUS: i32 = 10;
const FIRST_MISS_PENALTY: i32 = 2;
const PROLONGED_MISS_PENALTY: i32 = 5;
/// Misses from this one onward cost `PROLONGED_MISS_PENALTY` each.
const PROLONGED_MISS_FROM: u32 = 5;
const TREND_WINDOW_DAYS: i64 = 7;

/// Scores the last 30 days of commit history.
///
/// Only day presence matters for the score; the trend compares raw commit
/// counts of the last week against the week before.
pub fn evaluate_health<Tz: TimeZone>(
    commit_history: &[DateTime<Utc>],
    now: DateTime<Tz>,
) -> PlantHealth {
    let active = active_days(commit_history, &now);
    let presence = days_ending_today(&now, WINDOW_DAYS as u64)
        .into_iter()
        .map(|day| active.contains(&day));

    let current = raw_score(presence).clamp(MIN_HEALTH, MAX_HEALTH) as u32;

    PlantHealth {
        current,
        state: PlantState::from_score(current),
        trend: trend(commit_history, &now),
    }
}

/// Unclamped score for a presence sequence ordered today first.
fn raw_score(presence: impl IntoIterator<Item = bool>) -> i32 {
    let mut health = BASE_HEALTH;
    let mut consecutive_misses = 0;

    for active in presence {
        if active {
            health += ACTIVE_DAY_BONUS;
            consecutive_misses = 0;
        } else {
            consecutive_misses += 1;
            health -= miss_penalty(consecutive_misses);
        }
    }

    health
}

/// A lone miss stings, misses two to four are forgiven, then each day costs more.
fn miss_penalty(consecutive_misses: u32) -> i32 {
    match consecutive_misses {
        1 => FIRST_MISS_PENALTY,
        n if n >= PROLONGED_MISS_FROM => PROLONGED_MISS_PENALTY,
        _ => 0,
    }
}

fn trend<Tz: TimeZone>(commit_history: &[DateTime<Utc>], now: &DateTime<Tz>) -> Trend {
    let upper = now.with_timezone(&Utc);
    let week_ago = days_before(now, TREND_WINDOW_DAYS);
    let two_weeks_ago = days_before(now, 2 * TREND_WINDOW_DAYS);

    let recent = commit_history
        .iter()
        .filter(|ts| **ts >= week_ago && **ts <= upper)
        .count();
    let older = commit_history
        .iter()
        .filter(|ts| **ts >= two_weeks_ago && **ts < week_ago)
        .count();

    match recent.cmp(&older) {
        Ordering::Greater => Trend::Improving,
        Ordering::Less => Trend::Declining,
        Ordering::Equal => Trend::Stable,
    }
}
