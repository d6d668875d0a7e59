// SPDX-License-Identifier: Apache-2.0

//! Date formatting used in provenance notes and CSV comment cells.
//!
//! All functions take the reference time explicitly so transforms stay
//! reproducible.

use chrono::{DateTime, Datelike, Utc};

/// Formats `dt` relative to `now` (e.g., "3 days ago").
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use voyager_core::utils::format_relative_time;
///
/// let now = Utc::now();
/// assert_eq!(format_relative_time(&now, &now), "just now");
/// assert_eq!(format_relative_time(&(now - Duration::days(1)), &now), "1 day ago");
/// ```
#[must_use]
pub fn format_relative_time(dt: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(*dt);
    let days = duration.num_days();

    if days >= 365 {
        plural(days / 365, "year")
    } else if days > 30 {
        plural(days / 30, "month")
    } else if days > 0 {
        plural(days, "day")
    } else if duration.num_hours() > 0 {
        plural(duration.num_hours(), "hour")
    } else if duration.num_minutes() > 0 {
        plural(duration.num_minutes(), "minute")
    } else {
        "just now".to_string()
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// English ordinal suffix for a day of month.
#[must_use]
pub fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Long date such as `January 1st 2024`.
#[must_use]
pub fn format_long_date(dt: &DateTime<Utc>) -> String {
    let day = dt.day();
    format!(
        "{} {day}{} {}",
        dt.format("%B"),
        ordinal_suffix(day),
        dt.year()
    )
}

/// Timestamp in Jira's default CSV import format, e.g. `05/Mar/24 2:07 pm`.
#[must_use]
pub fn format_jira_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%d/%b/%y %-I:%M %P").to_string()
}
