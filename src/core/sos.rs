//! Emergency alerts. Recipients are captured once, when the alert is raised.

use crate::core::auth::Session;
use crate::core::calculator::geofence::Coordinates;
use crate::db::log::audit;
use crate::db::sos::{self as store, NewAlert};
use crate::db::{notifications, users};
use crate::errors::{AppError, AppResult};
use crate::models::notification::NewNotification;
use crate::models::role::Role;
use crate::models::sos::{NotifiedSnapshot, SosAlert, SosStatus};
use serde_json::json;

#[derive(Debug, Clone)]
pub struct TriggerRequest {
    pub coords: Coordinates,
    pub address: Option<String>,
    pub message: Option<String>,
}

/// Roles paged on every alert, besides the caller's own supervisor.
const ESCALATION_ROLES: [Role; 2] = [Role::CityManager, Role::Admin];

pub struct SosLogic;

impl SosLogic {
    pub fn trigger(s: &mut Session, req: &TriggerRequest) -> AppResult<SosAlert> {
        let caller = s.caller.clone();
        let now = s.now;

        let id = s.pool.with_tx(|tx| {
            let managers = users::ids_with_roles(tx, caller.org_id, &ESCALATION_ROLES)?;
            let notified = NotifiedSnapshot::capture(caller.supervisor_id, &managers);

            let id = store::insert_alert(
                tx,
                &NewAlert {
                    org_id: caller.org_id,
                    user_id: caller.id,
                    zone_id: caller.zone_id,
                    latitude: req.coords.latitude,
                    longitude: req.coords.longitude,
                    address: req.address.as_deref(),
                    message: req.message.as_deref(),
                    notified: &notified,
                },
                now,
            )?;

            let title = format!("SOS Alert: {}", caller.name);
            let body = match &req.address {
                Some(addr) => format!("{} has triggered an emergency SOS near {}.", caller.name, addr),
                None => format!("{} has triggered an emergency SOS.", caller.name),
            };
            let batch: Vec<NewNotification> = notified
                .ids()
                .iter()
                .map(|uid| NewNotification {
                    org_id: caller.org_id,
                    user_id: *uid,
                    kind: "sos",
                    title: title.clone(),
                    body: body.clone(),
                    data: json!({
                        "sos_id": id,
                        "user_id": caller.id,
                        "latitude": req.coords.latitude,
                        "longitude": req.coords.longitude,
                    }),
                })
                .collect();
            notifications::insert_many(tx, &batch, now)?;

            crate::db::log::write(
                tx,
                "sos_triggered",
                &format!("alert {}", id),
                &format!(
                    "⚠️ SOS from user {} ({}), {} recipient(s) notified",
                    caller.id,
                    caller.name,
                    notified.ids().len()
                ),
            )?;
            Ok(id)
        })?;

        load(s, id)
    }

    pub fn acknowledge(s: &mut Session, id: i64) -> AppResult<SosAlert> {
        s.require(Role::Supervisor)?;
        Self::advance(s, id, SosStatus::Acknowledged, None)
    }

    pub fn resolve(s: &mut Session, id: i64, notes: Option<&str>) -> AppResult<SosAlert> {
        s.require(Role::Supervisor)?;
        Self::advance(s, id, SosStatus::Resolved, notes)
    }

    fn advance(
        s: &mut Session,
        id: i64,
        next: SosStatus,
        notes: Option<&str>,
    ) -> AppResult<SosAlert> {
        let org_id = s.caller.org_id;
        let by = s.caller.id;
        let now = s.now;

        s.pool.with_tx(|tx| {
            let alert = store::find_in_org(tx, id, org_id)?
                .ok_or_else(|| AppError::NotFound("SOS alert not found".into()))?;
            if !alert.status.can_advance_to(next) {
                return Err(AppError::Conflict(format!(
                    "Alert is already {}",
                    alert.status.to_db_str()
                )));
            }
            match next {
                SosStatus::Acknowledged => store::mark_acknowledged(tx, id, by, now),
                _ => store::mark_resolved(tx, id, by, now, notes),
            }
        })?;

        audit(
            &s.pool.conn,
            "sos_update",
            &format!("alert {}", id),
            &format!("Alert {} by user {}", next.to_db_str(), by),
        );
        load(s, id)
    }

    pub fn list(s: &Session, status: Option<SosStatus>) -> AppResult<Vec<SosAlert>> {
        s.require(Role::Supervisor)?;
        store::list_for_org(&s.pool.conn, s.caller.org_id, status)
    }
}

fn load(s: &Session, id: i64) -> AppResult<SosAlert> {
    store::find_in_org(&s.pool.conn, id, s.caller.org_id)?
        .ok_or_else(|| AppError::NotFound("SOS alert not found".into()))
}
