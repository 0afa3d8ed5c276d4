//! In-organisation user administration.

use crate::core::auth::Session;
use crate::core::provision::{ProvisionedUser, create_user};
use crate::db::log::audit;
use crate::db::users::{self as store, UserFilter};
use crate::db::zones;
use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use crate::models::user::{NewUser, UserListing, UserProfile, UserUpdate};
use crate::utils::pagination::{Page, PageRequest};

pub struct UsersLogic;

impl UsersLogic {
    /// Supervisor+. Supervisors only see their direct reports.
    pub fn list(
        s: &Session,
        filter: &UserFilter,
        page: PageRequest,
    ) -> AppResult<Page<UserListing>> {
        s.require(Role::Supervisor)?;
        let mut filter = filter.clone();
        if s.caller.role == Role::Supervisor {
            filter.supervisor_id = Some(s.caller.id);
        }
        let (rows, total) =
            store::list_in_org(&s.pool.conn, s.caller.org_id, &filter, page.limit, page.offset())?;
        Ok(Page::new(rows, total, page))
    }

    /// City manager+. New users join the caller's organisation at a role no
    /// higher than the caller's own.
    pub fn create(
        s: &mut Session,
        user: &NewUser,
        token: Option<&str>,
    ) -> AppResult<ProvisionedUser> {
        s.require(Role::CityManager)?;
        if user.role > s.caller.role {
            return Err(AppError::Forbidden(format!(
                "Cannot create a user with role {}",
                user.role
            )));
        }
        let user = NewUser {
            org_id: s.caller.org_id,
            ..user.clone()
        };
        let created = create_user(&mut s.pool, &user, token, s.now)?;
        audit(
            &s.pool.conn,
            "user_create",
            &format!("user {}", created.profile.id),
            &format!("{} as {} by user {}", user.name, user.role, s.caller.id),
        );
        Ok(created)
    }

    /// City manager+. Users outside the organisation are not found; users
    /// ranked above the caller are off limits.
    pub fn update(s: &Session, id: i64, update: &UserUpdate) -> AppResult<UserProfile> {
        s.require(Role::CityManager)?;
        if update.is_empty() {
            return Err(AppError::validation("Nothing to update"));
        }
        if let Some(name) = &update.name
            && name.trim().is_empty()
        {
            return Err(AppError::validation("User name must not be empty"));
        }

        let org_id = s.caller.org_id;
        let conn = &s.pool.conn;
        let target = store::find_user_in_org(conn, id, org_id)?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        if target.role > s.caller.role {
            return Err(AppError::Forbidden("Insufficient permissions".into()));
        }

        if let Some(Some(zone_id)) = update.zone_id {
            zones::find_zone_in_org(conn, zone_id, org_id)?
                .ok_or_else(|| AppError::NotFound("Zone not found".into()))?;
        }
        if let Some(Some(sup)) = update.supervisor_id {
            if sup == id {
                return Err(AppError::validation("A user cannot supervise themselves"));
            }
            store::find_user_in_org(conn, sup, org_id)?
                .ok_or_else(|| AppError::NotFound("Supervisor not found".into()))?;
        }

        let updated = update.apply(target);
        store::update_profile(conn, &updated)?;
        audit(
            conn,
            "user_update",
            &format!("user {}", id),
            &format!("Profile edited by user {}", s.caller.id),
        );
        store::find_user_in_org(conn, id, org_id)?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }
}
