use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, Utc};

/// Calendar day of `now` in UTC.
pub fn today(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Parse an optional `YYYY-MM-DD` argument, falling back to `default`.
pub fn date_or(input: Option<&str>, default: NaiveDate) -> AppResult<NaiveDate> {
    match input {
        Some(s) => parse_date(s).ok_or_else(|| {
            AppError::validation(format!("Invalid date '{}'. Expected YYYY-MM-DD.", s))
        }),
        None => Ok(default),
    }
}

pub fn parse_optional_date(input: Option<&str>) -> AppResult<Option<NaiveDate>> {
    input
        .map(|s| {
            parse_date(s).ok_or_else(|| {
                AppError::validation(format!("Invalid date '{}'. Expected YYYY-MM-DD.", s))
            })
        })
        .transpose()
}
