use super::{get_enum, get_json, get_opt_ts, get_ts, ts_to_db};
use crate::errors::AppResult;
use crate::models::sos::{NotifiedSnapshot, SosAlert, SosStatus};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_alert(row: &Row) -> rusqlite::Result<SosAlert> {
    Ok(SosAlert {
        id: row.get("id")?,
        org_id: row.get("org_id")?,
        user_id: row.get("user_id")?,
        zone_id: row.get("zone_id")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        address: row.get("address")?,
        message: row.get("message")?,
        status: get_enum(row, "status", SosStatus::from_db_str)?,
        notified_user_ids: NotifiedSnapshot::from_stored(get_json(row, "notified_user_ids")?),
        acknowledged_by: row.get("acknowledged_by")?,
        acknowledged_at: get_opt_ts(row, "acknowledged_at")?,
        resolved_by: row.get("resolved_by")?,
        resolved_at: get_opt_ts(row, "resolved_at")?,
        resolution_notes: row.get("resolution_notes")?,
        created_at: get_ts(row, "created_at")?,
        user_name: None,
    })
}

pub struct NewAlert<'a> {
    pub org_id: i64,
    pub user_id: i64,
    pub zone_id: Option<i64>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<&'a str>,
    pub message: Option<&'a str>,
    pub notified: &'a NotifiedSnapshot,
}

pub fn insert_alert(conn: &Connection, a: &NewAlert, now: DateTime<Utc>) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO sos_alerts (org_id, user_id, zone_id, latitude, longitude, address, message,
                                 status, notified_user_ids, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            a.org_id,
            a.user_id,
            a.zone_id,
            a.latitude,
            a.longitude,
            a.address,
            a.message,
            SosStatus::Active.to_db_str(),
            serde_json::to_string(a.notified.ids())?,
            ts_to_db(&now),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_in_org(conn: &Connection, id: i64, org_id: i64) -> AppResult<Option<SosAlert>> {
    let alert = conn
        .query_row(
            "SELECT * FROM sos_alerts WHERE id = ?1 AND org_id = ?2",
            [id, org_id],
            map_alert,
        )
        .optional()?;
    Ok(alert)
}

pub fn mark_acknowledged(conn: &Connection, id: i64, by: i64, at: DateTime<Utc>) -> AppResult<()> {
    conn.execute(
        "UPDATE sos_alerts SET status = ?1, acknowledged_by = ?2, acknowledged_at = ?3 WHERE id = ?4",
        params![SosStatus::Acknowledged.to_db_str(), by, ts_to_db(&at), id],
    )?;
    Ok(())
}

pub fn mark_resolved(
    conn: &Connection,
    id: i64,
    by: i64,
    at: DateTime<Utc>,
    notes: Option<&str>,
) -> AppResult<()> {
    conn.execute(
        "UPDATE sos_alerts SET status = ?1, resolved_by = ?2, resolved_at = ?3, resolution_notes = ?4
         WHERE id = ?5",
        params![SosStatus::Resolved.to_db_str(), by, ts_to_db(&at), notes, id],
    )?;
    Ok(())
}

pub fn list_for_org(
    conn: &Connection,
    org_id: i64,
    status: Option<SosStatus>,
) -> AppResult<Vec<SosAlert>> {
    let mut stmt = conn.prepare(
        "SELECT s.*, u.name AS user_name
         FROM sos_alerts s
         JOIN users u ON u.id = s.user_id
         WHERE s.org_id = ?1 AND (?2 IS NULL OR s.status = ?2)
         ORDER BY s.created_at DESC, s.id DESC",
    )?;
    let rows = stmt.query_map(params![org_id, status.map(|s| s.to_db_str())], |row| {
        let mut a = map_alert(row)?;
        a.user_name = row.get("user_name")?;
        Ok(a)
    })?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
