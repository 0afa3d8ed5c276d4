use super::{date_to_db, get_date, get_enum, get_ts, ts_to_db};
use crate::errors::AppResult;
use crate::models::visit::{VisitLog, VisitRating};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

const VISIT_SELECT: &str = "SELECT v.*, e.name AS executive_name, w.name AS visitor_name
     FROM visit_logs v
     JOIN users e ON e.id = v.executive_id
     JOIN users w ON w.id = v.visitor_id";

fn map_visit(row: &Row) -> rusqlite::Result<VisitLog> {
    Ok(VisitLog {
        id: row.get("id")?,
        org_id: row.get("org_id")?,
        executive_id: row.get("executive_id")?,
        visitor_id: row.get("visitor_id")?,
        zone_id: row.get("zone_id")?,
        date: get_date(row, "date")?,
        visited_at: get_ts(row, "visited_at")?,
        rating: get_enum(row, "rating", VisitRating::from_db_str)?,
        remarks: row.get("remarks")?,
        photo_url: row.get("photo_url")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        executive_name: row.get("executive_name")?,
        visitor_name: row.get("visitor_name")?,
    })
}

pub struct NewVisit<'a> {
    pub org_id: i64,
    pub executive_id: i64,
    pub visitor_id: i64,
    pub zone_id: Option<i64>,
    pub rating: VisitRating,
    pub remarks: Option<&'a str>,
    pub photo_url: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

pub fn insert_visit(conn: &Connection, v: &NewVisit, at: DateTime<Utc>) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO visit_logs (org_id, executive_id, visitor_id, zone_id, date, visited_at, rating,
                                 remarks, photo_url, latitude, longitude)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            v.org_id,
            v.executive_id,
            v.visitor_id,
            v.zone_id,
            date_to_db(&at.date_naive()),
            ts_to_db(&at),
            v.rating.to_db_str(),
            v.remarks,
            v.photo_url,
            v.latitude,
            v.longitude,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_in_org(conn: &Connection, id: i64, org_id: i64) -> AppResult<Option<VisitLog>> {
    let sql = format!("{} WHERE v.id = ?1 AND v.org_id = ?2", VISIT_SELECT);
    let visit = conn.query_row(&sql, [id, org_id], map_visit).optional()?;
    Ok(visit)
}

/// Filters for visit listings. `None` means "any".
#[derive(Debug, Default, Clone)]
pub struct VisitFilter {
    pub executive_id: Option<i64>,
    /// Visits made by this user or about one of their direct reports.
    pub team_of: Option<i64>,
    pub date: Option<NaiveDate>,
}

/// The organisation's visits, newest first.
pub fn list_for_org(conn: &Connection, org_id: i64, filter: &VisitFilter) -> AppResult<Vec<VisitLog>> {
    let sql = format!(
        "{} WHERE v.org_id = ?1
             AND (?2 IS NULL OR v.executive_id = ?2)
             AND (?3 IS NULL OR v.visitor_id = ?3 OR e.supervisor_id = ?3)
             AND (?4 IS NULL OR v.date = ?4)
         ORDER BY v.visited_at DESC, v.id DESC",
        VISIT_SELECT
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params![
            org_id,
            filter.executive_id,
            filter.team_of,
            filter.date.as_ref().map(date_to_db)
        ],
        map_visit,
    )?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
