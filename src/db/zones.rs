use super::get_bool;
use crate::errors::AppResult;
use crate::models::zone::{NewZone, Zone};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_zone(row: &Row) -> rusqlite::Result<Zone> {
    Ok(Zone {
        id: row.get("id")?,
        org_id: row.get("org_id")?,
        name: row.get("name")?,
        city: row.get("city")?,
        meeting_lat: row.get("meeting_lat")?,
        meeting_lng: row.get("meeting_lng")?,
        meeting_address: row.get("meeting_address")?,
        geofence_radius: row.get("geofence_radius")?,
        is_active: get_bool(row, "is_active")?,
    })
}

pub fn insert_zone(conn: &Connection, z: &NewZone) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO zones (org_id, name, city, meeting_lat, meeting_lng, meeting_address, geofence_radius)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            z.org_id,
            z.name,
            z.city,
            z.meeting_point.latitude,
            z.meeting_point.longitude,
            z.meeting_address,
            z.geofence_radius,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_zone_in_org(conn: &Connection, id: i64, org_id: i64) -> AppResult<Option<Zone>> {
    let zone = conn
        .query_row(
            "SELECT * FROM zones WHERE id = ?1 AND org_id = ?2",
            [id, org_id],
            map_zone,
        )
        .optional()?;
    Ok(zone)
}

/// The organisation's active zones, by name.
pub fn active_for_org(conn: &Connection, org_id: i64) -> AppResult<Vec<Zone>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM zones WHERE org_id = ?1 AND is_active = 1 ORDER BY name ASC, id ASC",
    )?;
    let rows = stmt.query_map([org_id], map_zone)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
