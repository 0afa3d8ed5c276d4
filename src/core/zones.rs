//! Zones: the meeting point and geofence each check-in is measured against.

use crate::core::auth::Session;
use crate::db::log::audit;
use crate::db::zones;
use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use crate::models::zone::{NewZone, Zone};
use rusqlite::Connection;

/// Default fence when a zone is created without one, in metres.
pub const DEFAULT_GEOFENCE_RADIUS_M: i64 = 100;

/// Validate and store a zone, returning the stored row.
pub fn insert_checked(conn: &Connection, zone: &NewZone) -> AppResult<Zone> {
    if zone.name.trim().is_empty() {
        return Err(AppError::validation("Zone name is required"));
    }
    if zone.geofence_radius < 0 {
        return Err(AppError::validation("Geofence radius must not be negative"));
    }
    let id = zones::insert_zone(conn, zone)?;
    zones::find_zone_in_org(conn, id, zone.org_id)?
        .ok_or_else(|| AppError::Other(format!("zone {} vanished after insert", id)))
}

pub struct ZonesLogic;

impl ZonesLogic {
    /// Active zones of the caller's organisation.
    pub fn list(s: &Session) -> AppResult<Vec<Zone>> {
        zones::active_for_org(&s.pool.conn, s.caller.org_id)
    }

    /// Admin+. The zone always lands in the caller's organisation.
    pub fn create(s: &Session, zone: &NewZone) -> AppResult<Zone> {
        s.require(Role::Admin)?;
        let zone = NewZone {
            org_id: s.caller.org_id,
            ..zone.clone()
        };
        let conn = &s.pool.conn;
        let created = insert_checked(conn, &zone)?;
        audit(
            conn,
            "zone_create",
            &format!("zone {}", created.id),
            &format!(
                "{} ({}m fence) by user {}",
                created.name, created.geofence_radius, s.caller.id
            ),
        );
        Ok(created)
    }
}
