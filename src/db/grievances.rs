use super::{
    date_to_db, get_bool, get_enum, get_json, get_opt_date, get_opt_ts, get_ts, to_count, ts_to_db,
};
use crate::errors::AppResult;
use crate::models::grievance::{
    Grievance, GrievanceCategory, GrievanceStatus, NewGrievance, Submitter,
};
use crate::models::role::Role;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_grievance(row: &Row) -> rusqlite::Result<Grievance> {
    let against: Option<String> = row.get("against_role")?;
    Ok(Grievance {
        id: row.get("id")?,
        reference_no: row.get("reference_no")?,
        org_id: row.get("org_id")?,
        submitted_by: row.get("submitted_by")?,
        category: get_enum(row, "category", GrievanceCategory::from_db_str)?,
        against_role: against.as_deref().and_then(Role::from_db_str),
        incident_date: get_opt_date(row, "incident_date")?,
        description: row.get("description")?,
        evidence_urls: get_json(row, "evidence_urls")?,
        is_anonymous: get_bool(row, "is_anonymous")?,
        status: get_enum(row, "status", GrievanceStatus::from_db_str)?,
        resolution: row.get("resolution")?,
        reviewed_by: row.get("reviewed_by")?,
        reviewed_at: get_opt_ts(row, "reviewed_at")?,
        created_at: get_ts(row, "created_at")?,
        submitter: None,
    })
}

/// Next `GRV-YYYYMMDD-NNNNN` reference for the day of `now`. References are
/// unique across the whole store, so the sequence spans every organisation.
fn next_reference(conn: &Connection, now: DateTime<Utc>) -> AppResult<String> {
    let prefix = format!("GRV-{}-", now.format("%Y%m%d"));
    let taken: i64 = conn.query_row(
        "SELECT COUNT(*) FROM grievances WHERE reference_no LIKE ?1 || '%'",
        [&prefix],
        |row| row.get(0),
    )?;
    Ok(format!("{}{:05}", prefix, taken + 1))
}

pub fn insert_grievance(
    conn: &Connection,
    org_id: i64,
    submitted_by: i64,
    g: &NewGrievance,
    now: DateTime<Utc>,
) -> AppResult<i64> {
    let reference = next_reference(conn, now)?;
    conn.execute(
        "INSERT INTO grievances (reference_no, org_id, submitted_by, category, against_role,
                                 incident_date, description, evidence_urls, is_anonymous,
                                 status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            reference,
            org_id,
            submitted_by,
            g.category.to_db_str(),
            g.against_role.map(|r| r.to_db_str()),
            g.incident_date.as_ref().map(date_to_db),
            g.description,
            serde_json::to_string(&g.evidence_urls)?,
            g.is_anonymous,
            GrievanceStatus::Submitted.to_db_str(),
            ts_to_db(&now),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_in_org(conn: &Connection, id: i64, org_id: i64) -> AppResult<Option<Grievance>> {
    let g = conn
        .query_row(
            "SELECT * FROM grievances WHERE id = ?1 AND org_id = ?2",
            [id, org_id],
            map_grievance,
        )
        .optional()?;
    Ok(g)
}

/// The submitter's own grievances, newest first.
pub fn mine(conn: &Connection, user_id: i64) -> AppResult<Vec<Grievance>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM grievances WHERE submitted_by = ?1 ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map([user_id], map_grievance)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// One page of the organisation's grievances with the submitter joined in,
/// plus the total. Nothing is redacted here.
pub fn all_for_org(
    conn: &Connection,
    org_id: i64,
    status: Option<GrievanceStatus>,
    limit: u32,
    offset: u32,
) -> AppResult<(Vec<Grievance>, u64)> {
    let status = status.map(|s| s.to_db_str());
    let total: i64 = conn.query_row(
        "SELECT COUNT(*) FROM grievances WHERE org_id = ?1 AND (?2 IS NULL OR status = ?2)",
        params![org_id, status],
        |row| row.get(0),
    )?;

    let mut stmt = conn.prepare(
        "SELECT g.*, u.name AS s_name, u.employee_id AS s_employee_id,
                u.role AS s_role, u.zone_id AS s_zone_id
         FROM grievances g
         JOIN users u ON u.id = g.submitted_by
         WHERE g.org_id = ?1 AND (?2 IS NULL OR g.status = ?2)
         ORDER BY g.created_at DESC, g.id DESC
         LIMIT ?3 OFFSET ?4",
    )?;
    let rows = stmt.query_map(params![org_id, status, limit, offset], |row| {
        let mut g = map_grievance(row)?;
        g.submitter = Some(Submitter {
            name: row.get("s_name")?,
            employee_id: row.get("s_employee_id")?,
            role: get_enum(row, "s_role", Role::from_db_str)?,
            zone_id: row.get("s_zone_id")?,
        });
        Ok(g)
    })?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok((out, to_count(total)))
}

pub fn update_status(
    conn: &Connection,
    id: i64,
    status: GrievanceStatus,
    resolution: Option<&str>,
    reviewer: i64,
    at: DateTime<Utc>,
) -> AppResult<()> {
    conn.execute(
        "UPDATE grievances
         SET status = ?1, resolution = COALESCE(?2, resolution), reviewed_by = ?3, reviewed_at = ?4
         WHERE id = ?5",
        params![status.to_db_str(), resolution, reviewer, ts_to_db(&at), id],
    )?;
    Ok(())
}
