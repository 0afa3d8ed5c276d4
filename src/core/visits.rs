//! Supervisor field visits: who was visited, when, and how it went.

use crate::core::auth::Session;
use crate::core::calculator::geofence::Coordinates;
use crate::db::log::audit;
use crate::db::users;
use crate::db::visits::{self as store, NewVisit, VisitFilter};
use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use crate::models::visit::{VisitLog, VisitRating};
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct LogVisitRequest {
    pub executive_id: i64,
    pub rating: VisitRating,
    pub remarks: Option<String>,
    pub photo_url: Option<String>,
    pub coords: Option<Coordinates>,
}

pub struct VisitsLogic;

impl VisitsLogic {
    /// Supervisor+. The visit is dated by the clock and filed under the
    /// executive's zone, or the visitor's when the executive has none.
    pub fn log(s: &Session, req: &LogVisitRequest) -> AppResult<VisitLog> {
        s.require(Role::Supervisor)?;
        let conn = &s.pool.conn;
        let caller = &s.caller;
        let executive = users::find_user_in_org(conn, req.executive_id, caller.org_id)?
            .ok_or_else(|| AppError::NotFound("Executive not found".into()))?;

        let id = store::insert_visit(
            conn,
            &NewVisit {
                org_id: caller.org_id,
                executive_id: executive.id,
                visitor_id: caller.id,
                zone_id: executive.zone_id.or(caller.zone_id),
                rating: req.rating,
                remarks: req.remarks.as_deref(),
                photo_url: req.photo_url.as_deref(),
                latitude: req.coords.map(|c| c.latitude),
                longitude: req.coords.map(|c| c.longitude),
            },
            s.now,
        )?;
        audit(
            conn,
            "visit_log",
            &format!("visit {}", id),
            &format!(
                "User {} visited {} ({})",
                caller.id,
                executive.name,
                req.rating.to_db_str()
            ),
        );
        store::find_in_org(conn, id, caller.org_id)?
            .ok_or_else(|| AppError::Other(format!("visit {} vanished after insert", id)))
    }

    /// Visits about the caller, optionally for one day.
    pub fn mine(s: &Session, date: Option<NaiveDate>) -> AppResult<Vec<VisitLog>> {
        let filter = VisitFilter {
            executive_id: Some(s.caller.id),
            date,
            ..VisitFilter::default()
        };
        store::list_for_org(&s.pool.conn, s.caller.org_id, &filter)
    }

    /// Supervisor+. Supervisors see the visits they made and those about
    /// their direct reports; higher roles see the organisation.
    pub fn team(s: &Session, date: NaiveDate) -> AppResult<Vec<VisitLog>> {
        s.require(Role::Supervisor)?;
        let filter = VisitFilter {
            team_of: (s.caller.role == Role::Supervisor).then_some(s.caller.id),
            date: Some(date),
            ..VisitFilter::default()
        };
        store::list_for_org(&s.pool.conn, s.caller.org_id, &filter)
    }
}
