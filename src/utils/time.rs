//! Clock handling: the current instant, or the one pinned with `--now`.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};

pub fn parse_instant(s: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::validation(format!("Invalid timestamp '{}'. Expected RFC 3339.", s)))
}

/// The instant a command runs at.
pub fn resolve_now(pinned: Option<&str>) -> AppResult<DateTime<Utc>> {
    match pinned {
        Some(s) => parse_instant(s),
        None => Ok(Utc::now()),
    }
}

/// Total minutes rendered as `HHh MMm`, used in human-readable messages.
pub fn format_minutes(mins: i64) -> String {
    let m = mins.max(0);
    format!("{:02}h {:02}m", m / 60, m % 60)
}
