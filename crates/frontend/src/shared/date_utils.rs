//! Utilities for date ranges sent to the backend
//!
//! Date filters are whole days: the lower bound is sent as the start of the
//! day and the upper bound as its last millisecond, both in UTC.

use chrono::{DateTime, NaiveDate, Timelike, Utc};

/// "2024-03-15" -> "2024-03-15T00:00:00.000Z"
pub fn start_of_day_iso(date: NaiveDate) -> String {
    format!("{}T00:00:00.000Z", date.format("%Y-%m-%d"))
}

/// "2024-03-15" -> "2024-03-15T23:59:59.999Z"
pub fn end_of_day_iso(date: NaiveDate) -> String {
    format!("{}T23:59:59.999Z", date.format("%Y-%m-%d"))
}

/// Parse an ISO timestamp, `None` for anything unparsable
pub fn parse_iso(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `true` for a timestamp produced by [`end_of_day_iso`]
pub fn is_end_of_day(value: &DateTime<Utc>) -> bool {
    let time = value.time();
    time.hour() == 23 && time.minute() == 59 && time.second() == 59
}

/// Format ISO date string to DD.MM.YYYY format
/// Example: "2024-03-15" or "2024-03-15T14:02:26Z" -> "15.03.2024"
pub fn format_date(date_str: &str) -> String {
    let date_part = date_str.split('T').next().unwrap_or(date_str);
    if let Some((year, rest)) = date_part.split_once('-') {
        if let Some((month, day)) = rest.split_once('-') {
            return format!("{}.{}.{}", day, month, year);
        }
    }
    date_str.to_string()
}
