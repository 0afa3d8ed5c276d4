use super::{get_bool, get_json, get_opt_ts, get_ts, to_count, ts_to_db};
use crate::errors::AppResult;
use crate::models::notification::{NewNotification, Notification};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params};

fn map_notification(row: &Row) -> rusqlite::Result<Notification> {
    Ok(Notification {
        id: row.get("id")?,
        org_id: row.get("org_id")?,
        user_id: row.get("user_id")?,
        kind: row.get("type")?,
        title: row.get("title")?,
        body: row.get("body")?,
        data: get_json(row, "data")?,
        is_read: get_bool(row, "is_read")?,
        read_at: get_opt_ts(row, "read_at")?,
        created_at: get_ts(row, "created_at")?,
    })
}

/// Insert one row per recipient. Returns how many were written.
pub fn insert_many(
    conn: &Connection,
    items: &[NewNotification],
    now: DateTime<Utc>,
) -> AppResult<usize> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO notifications (org_id, user_id, type, title, body, data, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    let created = ts_to_db(&now);
    for n in items {
        stmt.execute(params![
            n.org_id,
            n.user_id,
            n.kind,
            n.title,
            n.body,
            serde_json::to_string(&n.data)?,
            created,
        ])?;
    }
    Ok(items.len())
}

pub fn list_for_user(
    conn: &Connection,
    user_id: i64,
    unread_only: bool,
    limit: u32,
    offset: u32,
) -> AppResult<(Vec<Notification>, u64)> {
    let total: i64 = conn.query_row(
        "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND (?2 = 0 OR is_read = 0)",
        params![user_id, unread_only],
        |row| row.get(0),
    )?;

    let mut stmt = conn.prepare(
        "SELECT * FROM notifications
         WHERE user_id = ?1 AND (?2 = 0 OR is_read = 0)
         ORDER BY created_at DESC, id DESC
         LIMIT ?3 OFFSET ?4",
    )?;
    let rows = stmt.query_map(params![user_id, unread_only, limit, offset], map_notification)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok((out, to_count(total)))
}

/// Mark one of the user's notifications read. Returns the rows touched.
pub fn mark_read(conn: &Connection, id: i64, user_id: i64, at: DateTime<Utc>) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE notifications SET is_read = 1, read_at = COALESCE(read_at, ?1)
         WHERE id = ?2 AND user_id = ?3",
        params![ts_to_db(&at), id, user_id],
    )?)
}

pub fn mark_all_read(conn: &Connection, user_id: i64, at: DateTime<Utc>) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE notifications SET is_read = 1, read_at = ?1 WHERE user_id = ?2 AND is_read = 0",
        params![ts_to_db(&at), user_id],
    )?)
}
