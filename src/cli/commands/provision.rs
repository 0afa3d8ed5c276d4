use super::Context;
use crate::cli::parser::ProvisionCmd;
use crate::core::calculator::geofence::Coordinates;
use crate::core::leaderboard::parse_period;
use crate::core::provision::ProvisionLogic;
use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use crate::models::user::NewUser;
use crate::models::zone::NewZone;
use crate::ui::envelope;
use crate::utils::date::parse_date;
use crate::utils::time::parse_instant;
use chrono::{DateTime, Utc};

/// `--on` accepts a plain date (midnight UTC) or an RFC 3339 instant.
fn resolve_on(on: Option<&str>, now: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
    match on {
        None => Ok(now),
        Some(s) => match parse_date(s) {
            Some(d) => Ok(d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()).unwrap_or(now)),
            None => parse_instant(s),
        },
    }
}

pub fn handle(action: &ProvisionCmd, ctx: &Context) -> AppResult<()> {
    let mut pool = ctx.pool()?;
    match action {
        ProvisionCmd::Org { name } => {
            envelope::created(&ProvisionLogic::org(&mut pool, name, ctx.now)?, "Organisation created")
        }

        ProvisionCmd::Zone {
            org,
            name,
            city,
            lat,
            lng,
            address,
            radius,
        } => {
            let zone = NewZone {
                org_id: *org,
                name: name.clone(),
                city: city.clone(),
                meeting_point: Coordinates::new(*lat, *lng)?,
                meeting_address: address.clone(),
                geofence_radius: *radius,
            };
            envelope::created(&ProvisionLogic::zone(&mut pool, &zone)?, "Zone created")
        }

        ProvisionCmd::User {
            org,
            name,
            mobile,
            employee_id,
            role,
            zone,
            supervisor,
            credential,
            inactive,
        } => {
            let role = Role::from_db_str(role)
                .ok_or_else(|| AppError::validation(format!("Unknown role '{}'", role)))?;
            let user = NewUser {
                org_id: *org,
                name: name.clone(),
                mobile: mobile.clone(),
                employee_id: employee_id.clone(),
                role,
                zone_id: *zone,
                supervisor_id: *supervisor,
                is_active: !*inactive,
            };
            let created = ProvisionLogic::user(&mut pool, &user, credential.as_deref(), ctx.now)?;
            envelope::created(&created, "User created")
        }

        ProvisionCmd::Deactivate { user } => {
            envelope::ok_with(&ProvisionLogic::set_active(&mut pool, *user, false)?, "User deactivated")
        }

        ProvisionCmd::Activate { user } => {
            envelope::ok_with(&ProvisionLogic::set_active(&mut pool, *user, true)?, "User activated")
        }

        ProvisionCmd::Score {
            user,
            period,
            score,
            on,
        } => {
            let kind = parse_period(period)?;
            let on = resolve_on(on.as_deref(), ctx.now)?;
            envelope::ok_with(
                &ProvisionLogic::score(&mut pool, *user, kind, on, *score)?,
                "Score recorded",
            )
        }
    }
}
