//! Calendar-day bucketing.
//!
//! A timestamp's day is its date in the time zone of `now`. Each timestamp is
//! converted with the zone's rules at that instant, so a DST change inside the
//! window moves the offset only for the timestamps after it.

use std::collections::BTreeSet;

use chrono::{DateTime, Days, FixedOffset, NaiveDate, TimeDelta, TimeZone, Utc};

/// Length of the trailing activity window, in days.
pub const WINDOW_DAYS: i64 = 30;

/// Source of `now` for the service. Tests pin it with `Fixed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// System clock in the machine's local offset.
    Local,
    /// System clock in UTC.
    Utc,
    Fixed(DateTime<FixedOffset>),
}

impl Clock {
    /// Name of the day-boundary policy, reported by the status endpoint.
    pub fn day_boundary(&self) -> &'static str {
        match self {
            Clock::Local => "local",
            Clock::Utc => "utc",
            Clock::Fixed(_) => "fixed",
        }
    }
}

pub fn day_key<Tz: TimeZone>(timestamp: &DateTime<Utc>, now: &DateTime<Tz>) -> NaiveDate {
    timestamp.with_timezone(&now.timezone()).date_naive()
}

/// Distinct calendar days that hold at least one timestamp, ascending.
pub fn active_days<'a, I, Tz>(timestamps: I, now: &DateTime<Tz>) -> BTreeSet<NaiveDate>
where
    I: IntoIterator<Item = &'a DateTime<Utc>>,
    Tz: TimeZone,
{
    timestamps.into_iter().map(|ts| day_key(ts, now)).collect()
}

/// `count` calendar days ending today, today first.
pub fn days_ending_today<Tz: TimeZone>(now: &DateTime<Tz>, count: u64) -> Vec<NaiveDate> {
    let today = now.date_naive();
    (0..count)
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .collect()
}

/// Instant `days` before `now`, in UTC.
pub fn days_before<Tz: TimeZone>(now: &DateTime<Tz>, days: i64) -> DateTime<Utc> {
    now.with_timezone(&Utc) - TimeDelta::days(days)
}

pub fn format_relative_time<Tz: TimeZone>(then: &DateTime<Utc>, now: &DateTime<Tz>) -> String {
    let diff = now.timestamp() - then.timestamp();

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        let mins = diff / 60;
        format!("{} minute{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if diff < 86400 {
        let hours = diff / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else {
        let days = diff / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    }
}
