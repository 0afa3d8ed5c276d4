//! Bearer-token authentication and role gates.

use crate::db::pool::DbPool;
use crate::db::{users, zones};
use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use crate::models::user::UserProfile;
use crate::models::zone::Zone;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

/// Resolves a bearer credential to a principal id.
pub trait IdentityProvider {
    fn resolve(&self, conn: &Connection, token: &str) -> AppResult<i64>;
}

/// Identity backed by the local `credentials` table.
pub struct StoreIdentity;

impl IdentityProvider for StoreIdentity {
    fn resolve(&self, conn: &Connection, token: &str) -> AppResult<i64> {
        users::user_id_for_token(conn, token)?
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".into()))
    }
}

/// An authenticated caller, with the clock the request runs at.
pub struct Session {
    pub pool: DbPool,
    pub caller: UserProfile,
    pub token: String,
    pub now: DateTime<Utc>,
}

impl Session {
    /// Caller must hold `tier` or higher.
    pub fn require(&self, tier: Role) -> AppResult<()> {
        require_role(&self.caller, tier)
    }
}

pub fn require_role(caller: &UserProfile, tier: Role) -> AppResult<()> {
    if caller.role.at_least(tier) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Insufficient permissions".into()))
    }
}

/// Resolve `token` through `identity` and load the caller's profile.
pub fn authenticate(
    conn: &Connection,
    identity: &dyn IdentityProvider,
    token: Option<&str>,
) -> AppResult<UserProfile> {
    let token = token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("No token provided".into()))?;

    let user_id = identity.resolve(conn, token)?;
    let profile = users::find_user(conn, user_id)?
        .ok_or_else(|| AppError::Unauthorized("User profile not found".into()))?;

    if !profile.is_active {
        return Err(AppError::Forbidden("Account is deactivated".into()));
    }
    Ok(profile)
}

pub fn open_session(
    pool: DbPool,
    identity: &dyn IdentityProvider,
    token: Option<&str>,
    now: DateTime<Utc>,
) -> AppResult<Session> {
    let caller = authenticate(&pool.conn, identity, token)?;
    Ok(Session {
        pool,
        caller,
        token: token.unwrap_or_default().trim().to_string(),
        now,
    })
}

#[derive(Debug, Serialize)]
pub struct Me {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub zone: Option<Zone>,
}

pub struct AuthLogic;

impl AuthLogic {
    /// The caller's profile with its default zone.
    pub fn me(session: &Session) -> AppResult<Me> {
        let zone = match session.caller.zone_id {
            Some(id) => zones::find_zone_in_org(&session.pool.conn, id, session.caller.org_id)?,
            None => None,
        };
        Ok(Me {
            profile: session.caller.clone(),
            zone,
        })
    }

    /// Revoke the presented credential and forget the push token.
    pub fn logout(session: &mut Session) -> AppResult<()> {
        let user_id = session.caller.id;
        let token = session.token.clone();
        session.pool.with_tx(|tx| {
            users::delete_credential(tx, &token)?;
            users::set_fcm_token(tx, user_id, None)?;
            Ok(())
        })?;
        crate::db::log::audit(
            &session.pool.conn,
            "logout",
            &format!("user {}", user_id),
            "Credential revoked",
        );
        Ok(())
    }
}
