//! Calendar helpers for streaks and weekly buckets
//!
//! All progression arithmetic happens on whole calendar days. "Today" is the
//! UTC date of the instant the caller supplies.
//! - Weeks start on Sunday
//! - Weekday indices run Sunday = 0 .. Saturday = 6

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// Truncate an instant to its calendar day
pub fn day_of(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

/// Index of `day` in a Sunday-first week
pub fn weekday_index(day: NaiveDate) -> usize {
    day.weekday().num_days_from_sunday() as usize
}

/// The most recent Sunday on or before `day`
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(weekday_index(day) as i64)
}

pub fn same_week(a: NaiveDate, b: NaiveDate) -> bool {
    week_start(a) == week_start(b)
}

/// Signed number of whole days from `earlier` to `later`
pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    (later - earlier).num_days()
}

/// Format a day as "YYYY-MM-DD"
pub fn day_bucket(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}
