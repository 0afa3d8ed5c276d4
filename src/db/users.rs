use super::{get_bool, get_enum, to_count, ts_to_db};
use crate::errors::AppResult;
use crate::models::role::Role;
use crate::models::user::{NewUser, Organisation, UserListing, UserProfile};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

const PROFILE_COLUMNS: &str = "id, org_id, name, mobile, employee_id, role, zone_id, \
     supervisor_id, fcm_token, is_active, created_at";

pub fn map_profile(row: &Row) -> rusqlite::Result<UserProfile> {
    Ok(UserProfile {
        id: row.get("id")?,
        org_id: row.get("org_id")?,
        name: row.get("name")?,
        mobile: row.get("mobile")?,
        employee_id: row.get("employee_id")?,
        role: get_enum(row, "role", Role::from_db_str)?,
        zone_id: row.get("zone_id")?,
        supervisor_id: row.get("supervisor_id")?,
        fcm_token: row.get("fcm_token")?,
        is_active: get_bool(row, "is_active")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_org(conn: &Connection, name: &str, now: DateTime<Utc>) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO organisations (name, created_at) VALUES (?1, ?2)",
        params![name, ts_to_db(&now)],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_org(conn: &Connection, id: i64) -> AppResult<Option<Organisation>> {
    let org = conn
        .query_row(
            "SELECT id, name, created_at FROM organisations WHERE id = ?1",
            [id],
            |row| {
                Ok(Organisation {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(org)
}

pub fn insert_user(conn: &Connection, user: &NewUser, now: DateTime<Utc>) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO users (org_id, name, mobile, employee_id, role, zone_id, supervisor_id, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            user.org_id,
            user.name,
            user.mobile,
            user.employee_id,
            user.role.to_db_str(),
            user.zone_id,
            user.supervisor_id,
            user.is_active,
            ts_to_db(&now),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_user(conn: &Connection, id: i64) -> AppResult<Option<UserProfile>> {
    let sql = format!("SELECT {} FROM users WHERE id = ?1", PROFILE_COLUMNS);
    let user = conn.query_row(&sql, [id], map_profile).optional()?;
    Ok(user)
}

pub fn find_user_in_org(conn: &Connection, id: i64, org_id: i64) -> AppResult<Option<UserProfile>> {
    let sql = format!(
        "SELECT {} FROM users WHERE id = ?1 AND org_id = ?2",
        PROFILE_COLUMNS
    );
    let user = conn.query_row(&sql, [id, org_id], map_profile).optional()?;
    Ok(user)
}

/// Ids of the organisation's users holding any of `roles`, lowest id first.
pub fn ids_with_roles(conn: &Connection, org_id: i64, roles: &[Role]) -> AppResult<Vec<i64>> {
    let mut out = Vec::new();
    let mut stmt =
        conn.prepare_cached("SELECT id FROM users WHERE org_id = ?1 AND role = ?2 ORDER BY id ASC")?;
    for role in roles {
        let rows = stmt.query_map(params![org_id, role.to_db_str()], |row| row.get::<_, i64>(0))?;
        for r in rows {
            out.push(r?);
        }
    }
    out.sort_unstable();
    Ok(out)
}

/// Filters for the user listing. `None` means "any".
#[derive(Debug, Default, Clone)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub zone_id: Option<i64>,
    pub is_active: Option<bool>,
    pub supervisor_id: Option<i64>,
}

/// One page of the organisation's users by name, plus the total.
pub fn list_in_org(
    conn: &Connection,
    org_id: i64,
    filter: &UserFilter,
    limit: u32,
    offset: u32,
) -> AppResult<(Vec<UserListing>, u64)> {
    let role = filter.role.map(|r| r.to_db_str());
    let condition = "u.org_id = ?1
         AND (?2 IS NULL OR u.role = ?2)
         AND (?3 IS NULL OR u.zone_id = ?3)
         AND (?4 IS NULL OR u.is_active = ?4)
         AND (?5 IS NULL OR u.supervisor_id = ?5)";

    let total: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM users u WHERE {}", condition),
        params![org_id, role, filter.zone_id, filter.is_active, filter.supervisor_id],
        |row| row.get(0),
    )?;

    let sql = format!(
        "SELECT u.*, z.name AS zone_name
         FROM users u
         LEFT JOIN zones z ON z.id = u.zone_id
         WHERE {} ORDER BY u.name ASC, u.id ASC LIMIT ?6 OFFSET ?7",
        condition
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params![
            org_id,
            role,
            filter.zone_id,
            filter.is_active,
            filter.supervisor_id,
            limit,
            offset
        ],
        |row| {
            Ok(UserListing {
                profile: map_profile(row)?,
                zone_name: row.get("zone_name")?,
            })
        },
    )?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok((out, to_count(total)))
}

/// Write back the editable fields of a profile.
pub fn update_profile(conn: &Connection, user: &UserProfile) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE users SET name = ?1, employee_id = ?2, zone_id = ?3, supervisor_id = ?4, is_active = ?5
         WHERE id = ?6 AND org_id = ?7",
        params![
            user.name,
            user.employee_id,
            user.zone_id,
            user.supervisor_id,
            user.is_active,
            user.id,
            user.org_id,
        ],
    )?)
}

pub fn set_active(conn: &Connection, id: i64, active: bool) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE users SET is_active = ?1 WHERE id = ?2",
        params![active, id],
    )?)
}

pub fn set_fcm_token(conn: &Connection, id: i64, token: Option<&str>) -> AppResult<()> {
    conn.execute(
        "UPDATE users SET fcm_token = ?1 WHERE id = ?2",
        params![token, id],
    )?;
    Ok(())
}

pub fn insert_credential(
    conn: &Connection,
    token: &str,
    user_id: i64,
    now: DateTime<Utc>,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO credentials (token, user_id, created_at) VALUES (?1, ?2, ?3)",
        params![token, user_id, ts_to_db(&now)],
    )?;
    Ok(())
}

pub fn user_id_for_token(conn: &Connection, token: &str) -> AppResult<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT user_id FROM credentials WHERE token = ?1",
            [token],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

pub fn delete_credential(conn: &Connection, token: &str) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM credentials WHERE token = ?1", [token])?)
}
