//! Per-user, per-day attendance state machine.
//!
//! ```text
//! NONE ──check_in──▶ CHECKED_IN ──break_start──▶ ON_BREAK
//!                        ▲   └──────check_out──┐     │
//!                        └──────break_end──────┼─────┘
//!                                              ▼
//!                                         CHECKED_OUT
//! ```
//!
//! The machine only does bookkeeping; loading and persisting the day is the
//! caller's job (see `core::attendance`).

use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceRecord, AttendanceStatus, BreakInterval};
use chrono::{DateTime, Utc};

/// Whole minutes between two instants, rounding the millisecond delta.
/// Negative deltas count as zero.
pub fn round_minutes(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let ms = (to - from).num_milliseconds();
    if ms <= 0 {
        return 0;
    }
    (ms as f64 / 60_000.0).round() as i64
}

/// `max(0, round(total) - break_minutes)`
pub fn working_minutes(checkin: DateTime<Utc>, checkout: DateTime<Utc>, break_minutes: i64) -> i64 {
    (round_minutes(checkin, checkout) - break_minutes).max(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub total_minutes: i64,
    pub break_minutes: i64,
    pub working_minutes: i64,
    /// Minutes of a break that was still open at checkout, if any.
    pub closed_break_minutes: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceDay {
    pub status: Option<AttendanceStatus>,
    pub checkin_at: Option<DateTime<Utc>>,
    pub checkout_at: Option<DateTime<Utc>>,
    pub break_minutes: i64,
    pub open_break_since: Option<DateTime<Utc>>,
}

impl AttendanceDay {
    /// No record yet for the day.
    pub fn none() -> Self {
        Self {
            status: None,
            checkin_at: None,
            checkout_at: None,
            break_minutes: 0,
            open_break_since: None,
        }
    }

    pub fn from_record(record: &AttendanceRecord, open_break: Option<&BreakInterval>) -> Self {
        Self {
            status: Some(record.status),
            checkin_at: Some(record.checkin_at),
            checkout_at: record.checkout_at,
            break_minutes: record.break_minutes,
            open_break_since: open_break.filter(|b| b.is_open()).map(|b| b.started_at),
        }
    }

    pub fn check_in(&mut self, at: DateTime<Utc>) -> AppResult<()> {
        if self.status.is_some() {
            return Err(AppError::Conflict("Already checked in today".into()));
        }
        self.status = Some(AttendanceStatus::CheckedIn);
        self.checkin_at = Some(at);
        Ok(())
    }

    pub fn start_break(&mut self, at: DateTime<Utc>) -> AppResult<()> {
        match self.status {
            None => Err(AppError::Conflict("Not checked in today".into())),
            Some(AttendanceStatus::CheckedIn) => {
                self.status = Some(AttendanceStatus::OnBreak);
                self.open_break_since = Some(at);
                Ok(())
            }
            Some(_) => Err(AppError::Conflict(
                "Cannot start break in current status".into(),
            )),
        }
    }

    /// Close the open break; returns its rounded duration in minutes.
    pub fn end_break(&mut self, at: DateTime<Utc>) -> AppResult<i64> {
        match self.status {
            None => Err(AppError::Conflict("Not checked in today".into())),
            Some(AttendanceStatus::OnBreak) => {
                let started = self
                    .open_break_since
                    .ok_or_else(|| AppError::validation("No open break found"))?;
                let minutes = round_minutes(started, at);
                self.break_minutes += minutes;
                self.open_break_since = None;
                self.status = Some(AttendanceStatus::CheckedIn);
                Ok(minutes)
            }
            Some(_) => Err(AppError::Conflict("Not currently on break".into())),
        }
    }

    /// Check out from `checked_in` or `on_break`. An open break is closed first.
    pub fn check_out(&mut self, at: DateTime<Utc>) -> AppResult<CheckoutSummary> {
        let checkin = match (self.status, self.checkin_at) {
            (None, _) | (_, None) => {
                return Err(AppError::Conflict("No check-in found for today".into()));
            }
            (Some(AttendanceStatus::CheckedOut), _) => {
                return Err(AppError::Conflict("Already checked out today".into()));
            }
            (Some(_), Some(checkin)) => checkin,
        };

        let closed_break_minutes = self.open_break_since.take().map(|started| {
            let minutes = round_minutes(started, at);
            self.break_minutes += minutes;
            minutes
        });

        self.status = Some(AttendanceStatus::CheckedOut);
        self.checkout_at = Some(at);

        Ok(CheckoutSummary {
            total_minutes: round_minutes(checkin, at),
            break_minutes: self.break_minutes,
            working_minutes: working_minutes(checkin, at, self.break_minutes),
            closed_break_minutes,
        })
    }
}
