use chrono::{DateTime, Duration, FixedOffset};

use crate::error::{AppError, AppResult};

/// Parses an `HH:MM` string into minutes-since-midnight. Returns `None` on malformed input.
pub fn parse_hhmm(value: &str) -> Option<i64> {
    let mut parts = value.splitn(2, ':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    Some(hours * 60 + minutes)
}

/// Formats minutes-since-midnight back into `HH:MM`, clamped to a 24h day.
pub fn format_hhmm(total_minutes: i64) -> String {
    let total_minutes = total_minutes.rem_euclid(24 * 60);
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

pub fn parse_datetime(value: &str) -> AppResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .map_err(|err| AppError::validation(format!("invalid ISO-8601 datetime '{value}': {err}")))
}

pub fn format_datetime(dt: DateTime<FixedOffset>) -> String {
    dt.to_rfc3339()
}

pub fn add_minutes(dt: DateTime<FixedOffset>, minutes: i64) -> DateTime<FixedOffset> {
    dt + Duration::minutes(minutes)
}

pub fn diff_minutes(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> i64 {
    end.signed_duration_since(start).num_minutes()
}

/// Converts a chrono `Weekday` (Monday=0) to storage convention (Sunday=0), per spec.md §9.
pub fn storage_weekday(weekday: chrono::Weekday) -> u8 {
    use chrono::Weekday::*;
    match weekday {
        Sun => 0,
        Mon => 1,
        Tue => 2,
        Wed => 3,
        Thu => 4,
        Fri => 5,
        Sat => 6,
    }
}
