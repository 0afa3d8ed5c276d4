//! Read-only aggregates over attendance, submissions and alerts.

use super::{date_to_db, get_bool, get_ts, to_count};
use crate::errors::AppResult;
use crate::models::attendance::AttendanceStatus;
use crate::models::grievance::GrievanceStatus;
use crate::models::role::Role;
use crate::models::sos::SosStatus;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, params};

fn count(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> AppResult<u64> {
    let n: i64 = conn.query_row(sql, params, |row| row.get(0))?;
    Ok(to_count(n))
}

/// Attendance rows for the day, and how many of them are not checked out.
pub fn attendance_counts(conn: &Connection, org_id: i64, date: &NaiveDate) -> AppResult<(u64, u64)> {
    let (total, open): (i64, i64) = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(CASE WHEN status != ?3 THEN 1 ELSE 0 END), 0)
         FROM attendance WHERE org_id = ?1 AND date = ?2",
        params![org_id, date_to_db(date), AttendanceStatus::CheckedOut.to_db_str()],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    Ok((to_count(total), to_count(open)))
}

/// Submissions made on the day, and how many converted.
pub fn submission_counts(conn: &Connection, org_id: i64, date: &NaiveDate) -> AppResult<(u64, u64)> {
    let (total, converted): (i64, i64) = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(is_converted), 0)
         FROM form_submissions WHERE org_id = ?1 AND substr(submitted_at, 1, 10) = ?2",
        params![org_id, date_to_db(date)],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    Ok((to_count(total), to_count(converted)))
}

pub fn active_executives(conn: &Connection, org_id: i64) -> AppResult<u64> {
    count(
        conn,
        "SELECT COUNT(*) FROM users WHERE org_id = ?1 AND role = ?2 AND is_active = 1",
        params![org_id, Role::Executive.to_db_str()],
    )
}

pub fn active_sos(conn: &Connection, org_id: i64) -> AppResult<u64> {
    count(
        conn,
        "SELECT COUNT(*) FROM sos_alerts WHERE org_id = ?1 AND status = ?2",
        params![org_id, SosStatus::Active.to_db_str()],
    )
}

pub fn open_grievances(conn: &Connection, org_id: i64) -> AppResult<u64> {
    count(
        conn,
        "SELECT COUNT(*) FROM grievances WHERE org_id = ?1 AND status = ?2",
        params![org_id, GrievanceStatus::Submitted.to_db_str()],
    )
}

/// A recent check-in with the user and zone names.
#[derive(Debug, Clone)]
pub struct CheckinEvent {
    pub id: i64,
    pub at: DateTime<Utc>,
    pub user_name: String,
    pub zone_name: Option<String>,
}

pub fn recent_checkins(conn: &Connection, org_id: i64, limit: u32) -> AppResult<Vec<CheckinEvent>> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.checkin_at, u.name AS user_name, z.name AS zone_name
         FROM attendance a
         JOIN users u ON u.id = a.user_id
         LEFT JOIN zones z ON z.id = a.zone_id
         WHERE a.org_id = ?1
         ORDER BY a.checkin_at DESC, a.id DESC LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![org_id, limit], |row| {
        Ok(CheckinEvent {
            id: row.get("id")?,
            at: get_ts(row, "checkin_at")?,
            user_name: row.get("user_name")?,
            zone_name: row.get("zone_name")?,
        })
    })?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

#[derive(Debug, Clone)]
pub struct SubmissionEvent {
    pub id: i64,
    pub at: DateTime<Utc>,
    pub user_name: String,
    pub is_converted: bool,
    pub outlet_name: Option<String>,
    pub activity_id: Option<String>,
}

pub fn recent_submissions(
    conn: &Connection,
    org_id: i64,
    limit: u32,
) -> AppResult<Vec<SubmissionEvent>> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.submitted_at, s.is_converted, s.outlet_name, s.activity_id, u.name AS user_name
         FROM form_submissions s
         JOIN users u ON u.id = s.user_id
         WHERE s.org_id = ?1
         ORDER BY s.submitted_at DESC, s.id DESC LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![org_id, limit], |row| {
        Ok(SubmissionEvent {
            id: row.get("id")?,
            at: get_ts(row, "submitted_at")?,
            user_name: row.get("user_name")?,
            is_converted: get_bool(row, "is_converted")?,
            outlet_name: row.get("outlet_name")?,
            activity_id: row.get("activity_id")?,
        })
    })?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

#[derive(Debug, Clone)]
pub struct SosEvent {
    pub id: i64,
    pub at: DateTime<Utc>,
    pub user_name: String,
    pub status: String,
}

pub fn recent_sos(conn: &Connection, org_id: i64, limit: u32) -> AppResult<Vec<SosEvent>> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.created_at, s.status, u.name AS user_name
         FROM sos_alerts s
         JOIN users u ON u.id = s.user_id
         WHERE s.org_id = ?1
         ORDER BY s.created_at DESC, s.id DESC LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![org_id, limit], |row| {
        Ok(SosEvent {
            id: row.get("id")?,
            at: get_ts(row, "created_at")?,
            user_name: row.get("user_name")?,
            status: row.get("status")?,
        })
    })?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// `(submitted_at, is_converted)` for every submission of the day.
pub fn submissions_on(
    conn: &Connection,
    org_id: i64,
    date: &NaiveDate,
) -> AppResult<Vec<(DateTime<Utc>, bool)>> {
    let mut stmt = conn.prepare(
        "SELECT submitted_at, is_converted FROM form_submissions
         WHERE org_id = ?1 AND substr(submitted_at, 1, 10) = ?2",
    )?;
    let rows = stmt.query_map(params![org_id, date_to_db(date)], |row| {
        Ok((get_ts(row, "submitted_at")?, get_bool(row, "is_converted")?))
    })?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
