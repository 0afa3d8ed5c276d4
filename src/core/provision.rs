//! Operator-side provisioning: organisations, zones, users with their bearer
//! credential, and leaderboard scores.

use crate::core::calculator::period::period_start;
use crate::core::zones::insert_checked;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::{is_unique_violation, leaderboard, users, zones};
use crate::errors::{AppError, AppResult};
use crate::models::leaderboard::{LeaderboardScore, PeriodKind};
use crate::models::user::{NewUser, Organisation, UserProfile};
use crate::models::zone::{NewZone, Zone};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedUser {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub token: String,
}

/// Random token handed out when the operator does not choose one.
pub fn generated_token() -> String {
    format!("kin_{}", Uuid::new_v4().simple())
}

/// Validate the user's links, then store it with its credential in one
/// transaction. A taken token is a conflict.
pub fn create_user(
    pool: &mut DbPool,
    user: &NewUser,
    token: Option<&str>,
    now: DateTime<Utc>,
) -> AppResult<ProvisionedUser> {
    if user.name.trim().is_empty() || user.mobile.trim().is_empty() {
        return Err(AppError::validation("User name and mobile are required"));
    }
    {
        let conn = &pool.conn;
        users::find_org(conn, user.org_id)?
            .ok_or_else(|| AppError::NotFound("Organisation not found".into()))?;
        if let Some(zone_id) = user.zone_id {
            zones::find_zone_in_org(conn, zone_id, user.org_id)?
                .ok_or_else(|| AppError::NotFound("Zone not found".into()))?;
        }
        if let Some(sup) = user.supervisor_id {
            users::find_user_in_org(conn, sup, user.org_id)?
                .ok_or_else(|| AppError::NotFound("Supervisor not found".into()))?;
        }
    }

    let result = pool.with_tx(|tx| {
        let id = users::insert_user(tx, user, now)?;
        let token = match token {
            Some(t) => t.trim().to_string(),
            None => generated_token(),
        };
        users::insert_credential(tx, &token, id, now)?;
        Ok((id, token))
    });
    let (id, token) = match result {
        Ok(v) => v,
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::Conflict("Token already in use".into()));
        }
        Err(e) => return Err(e),
    };

    let profile = users::find_user(&pool.conn, id)?
        .ok_or_else(|| AppError::Other(format!("user {} vanished after insert", id)))?;
    Ok(ProvisionedUser { profile, token })
}

pub struct ProvisionLogic;

impl ProvisionLogic {
    pub fn org(pool: &mut DbPool, name: &str, now: DateTime<Utc>) -> AppResult<Organisation> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Organisation name is required"));
        }
        let conn = &pool.conn;
        let id = users::insert_org(conn, name, now)?;
        audit(conn, "provision_org", &format!("org {}", id), name);
        users::find_org(conn, id)?
            .ok_or_else(|| AppError::Other(format!("organisation {} vanished after insert", id)))
    }

    pub fn zone(pool: &mut DbPool, zone: &NewZone) -> AppResult<Zone> {
        let conn = &pool.conn;
        users::find_org(conn, zone.org_id)?
            .ok_or_else(|| AppError::NotFound("Organisation not found".into()))?;

        let created = insert_checked(conn, zone)?;
        audit(
            conn,
            "provision_zone",
            &format!("zone {}", created.id),
            &format!("{} ({}m fence)", created.name, created.geofence_radius),
        );
        Ok(created)
    }

    /// Create a user and the credential it authenticates with.
    pub fn user(
        pool: &mut DbPool,
        user: &NewUser,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<ProvisionedUser> {
        let created = create_user(pool, user, token, now)?;
        audit(
            &pool.conn,
            "provision_user",
            &format!("user {}", created.profile.id),
            &format!("{} as {}", user.name, user.role.to_db_str()),
        );
        Ok(created)
    }

    pub fn set_active(pool: &mut DbPool, user_id: i64, active: bool) -> AppResult<UserProfile> {
        let conn = &pool.conn;
        if users::set_active(conn, user_id, active)? == 0 {
            return Err(AppError::NotFound("User not found".into()));
        }
        let op = if active { "provision_activate" } else { "provision_deactivate" };
        audit(conn, op, &format!("user {}", user_id), "Active flag changed");
        users::find_user(conn, user_id)?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    /// Record a score for the period of `kind` containing `on`.
    pub fn score(
        pool: &mut DbPool,
        user_id: i64,
        kind: PeriodKind,
        on: DateTime<Utc>,
        score: f64,
    ) -> AppResult<LeaderboardScore> {
        let conn = &pool.conn;
        let user = users::find_user(conn, user_id)?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        let start: NaiveDate = period_start(on, kind);

        leaderboard::upsert_score(conn, user.id, user.org_id, user.zone_id, kind, &start, score)?;
        audit(
            conn,
            "provision_score",
            &format!("user {}", user.id),
            &format!("{} {} = {}", kind.to_db_str(), start, score),
        );
        leaderboard::find_score(conn, user.id, kind, &start)?
            .ok_or_else(|| AppError::Other("score row missing after upsert".into()))
    }
}
