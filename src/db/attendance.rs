use super::{date_to_db, get_date, get_enum, get_opt_ts, get_ts, to_count, ts_to_db};
use crate::errors::AppResult;
use crate::models::attendance::{AttendanceRecord, AttendanceStatus, BreakInterval, TeamAttendance};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_record(row: &Row) -> rusqlite::Result<AttendanceRecord> {
    Ok(AttendanceRecord {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        org_id: row.get("org_id")?,
        zone_id: row.get("zone_id")?,
        activity_id: row.get("activity_id")?,
        date: get_date(row, "date")?,
        status: get_enum(row, "status", AttendanceStatus::from_db_str)?,
        checkin_at: get_ts(row, "checkin_at")?,
        checkin_lat: row.get("checkin_lat")?,
        checkin_lng: row.get("checkin_lng")?,
        checkin_selfie_url: row.get("checkin_selfie_url")?,
        checkin_distance_m: row.get("checkin_distance_m")?,
        checkout_at: get_opt_ts(row, "checkout_at")?,
        checkout_lat: row.get("checkout_lat")?,
        checkout_lng: row.get("checkout_lng")?,
        checkout_selfie_url: row.get("checkout_selfie_url")?,
        break_minutes: row.get("break_minutes")?,
        working_minutes: row.get("working_minutes")?,
        breaks: None,
    })
}

fn map_break(row: &Row) -> rusqlite::Result<BreakInterval> {
    Ok(BreakInterval {
        id: row.get("id")?,
        attendance_id: row.get("attendance_id")?,
        user_id: row.get("user_id")?,
        started_at: get_ts(row, "started_at")?,
        ended_at: get_opt_ts(row, "ended_at")?,
        duration_minutes: row.get("duration_minutes")?,
    })
}

pub fn find_for_day(
    conn: &Connection,
    user_id: i64,
    date: &NaiveDate,
) -> AppResult<Option<AttendanceRecord>> {
    let rec = conn
        .query_row(
            "SELECT * FROM attendance WHERE user_id = ?1 AND date = ?2",
            params![user_id, date_to_db(date)],
            map_record,
        )
        .optional()?;
    Ok(rec)
}

pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Option<AttendanceRecord>> {
    let rec = conn
        .query_row("SELECT * FROM attendance WHERE id = ?1", [id], map_record)
        .optional()?;
    Ok(rec)
}

/// Fields written by a successful check-in.
pub struct CheckIn<'a> {
    pub user_id: i64,
    pub org_id: i64,
    pub zone_id: Option<i64>,
    pub activity_id: Option<&'a str>,
    pub date: NaiveDate,
    pub at: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub selfie_url: Option<&'a str>,
    pub distance_m: i64,
}

pub fn insert_checkin(conn: &Connection, c: &CheckIn) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO attendance (user_id, org_id, zone_id, activity_id, date, status,
                                 checkin_at, checkin_lat, checkin_lng, checkin_selfie_url, checkin_distance_m)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            c.user_id,
            c.org_id,
            c.zone_id,
            c.activity_id,
            date_to_db(&c.date),
            AttendanceStatus::CheckedIn.to_db_str(),
            ts_to_db(&c.at),
            c.latitude,
            c.longitude,
            c.selfie_url,
            c.distance_m,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn set_status(
    conn: &Connection,
    id: i64,
    status: AttendanceStatus,
    break_minutes: i64,
) -> AppResult<()> {
    conn.execute(
        "UPDATE attendance SET status = ?1, break_minutes = ?2 WHERE id = ?3",
        params![status.to_db_str(), break_minutes, id],
    )?;
    Ok(())
}

pub struct CheckOut<'a> {
    pub at: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub selfie_url: Option<&'a str>,
    pub break_minutes: i64,
    pub working_minutes: i64,
}

pub fn apply_checkout(conn: &Connection, id: i64, c: &CheckOut) -> AppResult<()> {
    conn.execute(
        "UPDATE attendance
         SET status = ?1, checkout_at = ?2, checkout_lat = ?3, checkout_lng = ?4,
             checkout_selfie_url = ?5, break_minutes = ?6, working_minutes = ?7
         WHERE id = ?8",
        params![
            AttendanceStatus::CheckedOut.to_db_str(),
            ts_to_db(&c.at),
            c.latitude,
            c.longitude,
            c.selfie_url,
            c.break_minutes,
            c.working_minutes,
            id,
        ],
    )?;
    Ok(())
}

pub fn insert_break(
    conn: &Connection,
    attendance_id: i64,
    user_id: i64,
    at: DateTime<Utc>,
) -> AppResult<BreakInterval> {
    conn.execute(
        "INSERT INTO breaks (attendance_id, user_id, started_at) VALUES (?1, ?2, ?3)",
        params![attendance_id, user_id, ts_to_db(&at)],
    )?;
    Ok(BreakInterval {
        id: conn.last_insert_rowid(),
        attendance_id,
        user_id,
        started_at: at,
        ended_at: None,
        duration_minutes: None,
    })
}

pub fn open_break(conn: &Connection, attendance_id: i64) -> AppResult<Option<BreakInterval>> {
    let b = conn
        .query_row(
            "SELECT * FROM breaks WHERE attendance_id = ?1 AND ended_at IS NULL",
            [attendance_id],
            map_break,
        )
        .optional()?;
    Ok(b)
}

pub fn close_break(conn: &Connection, id: i64, at: DateTime<Utc>, minutes: i64) -> AppResult<()> {
    conn.execute(
        "UPDATE breaks SET ended_at = ?1, duration_minutes = ?2 WHERE id = ?3",
        params![ts_to_db(&at), minutes, id],
    )?;
    Ok(())
}

pub fn breaks_for(conn: &Connection, attendance_id: i64) -> AppResult<Vec<BreakInterval>> {
    let mut stmt =
        conn.prepare_cached("SELECT * FROM breaks WHERE attendance_id = ?1 ORDER BY started_at ASC")?;
    let rows = stmt.query_map([attendance_id], map_break)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// One page of a user's records, newest first, plus the total count.
pub fn history(
    conn: &Connection,
    user_id: i64,
    limit: u32,
    offset: u32,
) -> AppResult<(Vec<AttendanceRecord>, u64)> {
    let total: i64 = conn.query_row(
        "SELECT COUNT(*) FROM attendance WHERE user_id = ?1",
        [user_id],
        |row| row.get(0),
    )?;

    let mut stmt = conn.prepare(
        "SELECT * FROM attendance WHERE user_id = ?1 ORDER BY date DESC LIMIT ?2 OFFSET ?3",
    )?;
    let rows = stmt.query_map(params![user_id, limit, offset], map_record)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok((out, to_count(total)))
}

pub fn team_for_day(
    conn: &Connection,
    org_id: i64,
    date: &NaiveDate,
    zone_id: Option<i64>,
) -> AppResult<Vec<TeamAttendance>> {
    let mut stmt = conn.prepare(
        "SELECT a.*, u.name AS user_name, u.employee_id AS employee_id, u.supervisor_id AS supervisor_id
         FROM attendance a
         JOIN users u ON u.id = a.user_id
         WHERE a.org_id = ?1 AND a.date = ?2 AND (?3 IS NULL OR a.zone_id = ?3)
         ORDER BY a.checkin_at ASC",
    )?;
    let rows = stmt.query_map(params![org_id, date_to_db(date), zone_id], |row| {
        Ok(TeamAttendance {
            record: map_record(row)?,
            user_name: row.get("user_name")?,
            employee_id: row.get("employee_id")?,
            supervisor_id: row.get("supervisor_id")?,
        })
    })?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Id of a user's record for a date, used to link form submissions.
pub fn id_for_day(conn: &Connection, user_id: i64, date: &NaiveDate) -> AppResult<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM attendance WHERE user_id = ?1 AND date = ?2",
            params![user_id, date_to_db(date)],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}
