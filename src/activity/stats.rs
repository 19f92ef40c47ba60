use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use super::calendar::{active_days, days_before, WINDOW_DAYS};
use crate::models::{CommitStats, RawEvent};

/// Derives commit statistics from a raw event list.
///
/// Only push events inside `[now - 30 days, now]` are considered; everything
/// else is ignored.
pub fn derive_stats<Tz: TimeZone>(events: &[RawEvent], now: DateTime<Tz>) -> CommitStats {
    let cutoff = days_before(&now, WINDOW_DAYS);
    let upper = now.with_timezone(&Utc);

    let mut commit_history: Vec<DateTime<Utc>> = events
        .iter()
        .filter(|event| event.is_push())
        .map(|event| event.created_at)
        .filter(|ts| *ts >= cutoff && *ts <= upper)
        .collect();
    commit_history.sort_unstable_by(|a, b| b.cmp(a));

    let days = active_days(&commit_history, &now);

    CommitStats {
        total_commits: commit_history.len(),
        current_streak: current_streak(&days, now.date_naive()),
        longest_streak: longest_streak(&days),
        last_commit_date: commit_history.first().copied(),
        commit_history,
    }
}

/// Walks backward from `today` while days are active.
///
/// An empty `today` is skipped once when nothing has been counted yet, so a
/// streak that ended yesterday survives until the day is over.
fn current_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;

    loop {
        if days.contains(&day) {
            streak += 1;
        } else if streak > 0 || day != today {
            break;
        }

        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }

    streak
}

fn longest_streak(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;

    for &day in days {
        run = match prev {
            Some(p) if p.succ_opt() == Some(day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }

    longest
}
