pub mod config;
pub mod mood;
pub mod routine;
pub mod settings;
pub mod speech;
pub mod task;
pub mod timer;

use chrono::{DateTime, Local, NaiveTime, Utc};
use serde::Serialize;

/// Parse `HH:MM` (today, local time) or a full RFC 3339 timestamp.
pub fn parse_time(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t.with_timezone(&Utc));
    }
    let time = NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| format!("expected HH:MM or an RFC 3339 timestamp, got '{s}'"))?;
    Local::now()
        .date_naive()
        .and_time(time)
        .and_local_timezone(Local)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
        .ok_or_else(|| format!("'{s}' does not exist in the local timezone"))
}

/// Local `HH:MM` for display.
pub fn local_clock(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
