// Display formatting for feed timestamps
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

// Feed timestamps are local wall-clock times such as "2024-05-01T18:30:00".
// Offsets, when present, are dropped rather than converted.
fn parse_feed_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_local())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

// dd.mm.yyyy with zero-padded day and month. Unparseable input is shown as-is.
pub fn format_date(value: &str) -> String {
    match parse_feed_timestamp(value) {
        Some(timestamp) => timestamp.format("%d.%m.%Y").to_string(),
        None => {
            debug!(value, "unparseable feed date");
            value.to_string()
        }
    }
}

// Start time as HH:MM on a 24-hour clock
pub fn format_start_time(value: &str) -> String {
    match parse_feed_timestamp(value) {
        Some(timestamp) => timestamp.format("%H:%M").to_string(),
        None => {
            debug!(value, "unparseable feed start time");
            value.to_string()
        }
    }
}

// Date as sent in the schedule's dt parameter
pub fn format_query_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}
