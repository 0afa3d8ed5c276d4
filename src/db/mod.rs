pub mod analytics;
pub mod attendance;
pub mod broadcast;
pub mod forms;
pub mod grievances;
pub mod leaderboard;
pub mod learning;
pub mod log;
pub mod migrate;
pub mod notifications;
pub mod pool;
pub mod sos;
pub mod stats;
pub mod stock;
pub mod users;
pub mod visits;
pub mod zones;

use crate::errors::AppError;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::Row;
use rusqlite::types::Type;
use serde::de::DeserializeOwned;

fn conversion(col: &str, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        Type::Text,
        Box::new(AppError::Other(format!("column '{}': {}", col, msg))),
    )
}

/// Timestamps are stored as RFC 3339 text, UTC, millisecond precision.
pub fn ts_to_db(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn date_to_db(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

fn parse_ts(col: &str, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion(col, format!("invalid timestamp '{}': {}", s, e)))
}

pub fn get_ts(row: &Row, col: &str) -> rusqlite::Result<DateTime<Utc>> {
    let s: String = row.get(col)?;
    parse_ts(col, &s)
}

pub fn get_opt_ts(row: &Row, col: &str) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let s: Option<String> = row.get(col)?;
    s.map(|s| parse_ts(col, &s)).transpose()
}

pub fn get_date(row: &Row, col: &str) -> rusqlite::Result<NaiveDate> {
    let s: String = row.get(col)?;
    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .map_err(|_| conversion(col, format!("invalid date '{}'", s)))
}

pub fn get_opt_date(row: &Row, col: &str) -> rusqlite::Result<Option<NaiveDate>> {
    let s: Option<String> = row.get(col)?;
    s.map(|s| {
        NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map_err(|_| conversion(col, format!("invalid date '{}'", s)))
    })
    .transpose()
}

/// Decode a TEXT column through one of the models' `from_db_str` parsers.
pub fn get_enum<T>(row: &Row, col: &str, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    let s: String = row.get(col)?;
    parse(&s).ok_or_else(|| conversion(col, format!("unexpected value '{}'", s)))
}

pub fn get_json<T: DeserializeOwned>(row: &Row, col: &str) -> rusqlite::Result<T> {
    let s: String = row.get(col)?;
    serde_json::from_str(&s).map_err(|e| conversion(col, e.to_string()))
}

pub fn get_bool(row: &Row, col: &str) -> rusqlite::Result<bool> {
    Ok(row.get::<_, i64>(col)? != 0)
}

pub fn get_opt_bool(row: &Row, col: &str) -> rusqlite::Result<Option<bool>> {
    Ok(row.get::<_, Option<i64>>(col)?.map(|v| v != 0))
}

/// A `COUNT(*)` result; SQLite hands integers back as `i64`.
pub fn to_count(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

/// True when the store rejected a write because of a UNIQUE constraint.
pub fn is_unique_violation(err: &AppError) -> bool {
    matches!(
        err,
        AppError::Db(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}
