use crate::core::auth::Session;
use crate::core::calculator::attendance::{AttendanceDay, CheckoutSummary};
use crate::core::calculator::geofence::{self, Coordinates};
use crate::core::visibility::scope_to_team;
use crate::db::attendance::{self as store, CheckIn, CheckOut};
use crate::db::log::audit;
use crate::db::{is_unique_violation, zones};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceRecord, AttendanceStatus, BreakInterval, TeamAttendance};
use crate::models::role::Role;
use crate::models::zone::Zone;
use crate::utils::date::today;
use crate::utils::pagination::{Page, PageRequest};
use crate::utils::time::format_minutes;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct CheckInRequest {
    pub coords: Coordinates,
    pub zone_id: Option<i64>,
    pub selfie_url: Option<String>,
    pub activity_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CheckOutRequest {
    pub coords: Coordinates,
    pub selfie_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BreakEnded {
    pub break_duration_minutes: i64,
}

/// High-level business logic for the `attendance` command.
pub struct AttendanceLogic;

impl AttendanceLogic {
    pub fn check_in(s: &mut Session, req: &CheckInRequest) -> AppResult<AttendanceRecord> {
        let date = today(s.now);
        let conn = &s.pool.conn;
        let caller = &s.caller;

        let mut day = match store::find_for_day(conn, caller.id, &date)? {
            Some(rec) => AttendanceDay::from_record(&rec, None),
            None => AttendanceDay::none(),
        };
        day.check_in(s.now)?;

        // ------------------------------------------------
        // Zone + geofence
        // ------------------------------------------------
        let zone_id = req.zone_id.or(caller.zone_id);
        let zone: Option<Zone> = match (req.zone_id, caller.zone_id) {
            (Some(id), _) => Some(
                zones::find_zone_in_org(conn, id, caller.org_id)?
                    .ok_or_else(|| AppError::NotFound("Zone not found".into()))?,
            ),
            (None, Some(id)) => zones::find_zone_in_org(conn, id, caller.org_id)?,
            (None, None) => None,
        };

        let mut distance_m = 0;
        if let Some(zone) = &zone {
            let check = geofence::evaluate(req.coords, zone.meeting_point(), zone.geofence_radius);
            distance_m = check.distance_m;
            if !check.within_fence {
                return Err(AppError::GeofenceViolation {
                    distance: check.distance_m,
                    required: zone.geofence_radius,
                    zone: zone.name.clone(),
                });
            }
        }

        let row = CheckIn {
            user_id: caller.id,
            org_id: caller.org_id,
            zone_id,
            activity_id: req.activity_id.as_deref(),
            date,
            at: s.now,
            latitude: req.coords.latitude,
            longitude: req.coords.longitude,
            selfie_url: req.selfie_url.as_deref(),
            distance_m,
        };
        let id = match store::insert_checkin(conn, &row) {
            Ok(id) => id,
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::Conflict("Already checked in today".into()));
            }
            Err(e) => return Err(e),
        };

        audit(
            conn,
            "checkin",
            &format!("user {}", caller.id),
            &format!("Checked in on {} at {}m from zone", date, distance_m),
        );

        store::find_by_id(conn, id)?
            .ok_or_else(|| AppError::Other(format!("attendance {} vanished after insert", id)))
    }

    pub fn start_break(s: &mut Session) -> AppResult<BreakInterval> {
        let date = today(s.now);
        let now = s.now;
        let user_id = s.caller.id;

        let interval = s.pool.with_tx(|tx| {
            let rec = store::find_for_day(tx, user_id, &date)?
                .ok_or_else(|| AppError::Conflict("Not checked in today".into()))?;
            let mut day = AttendanceDay::from_record(&rec, None);
            day.start_break(now)?;

            let interval = match store::insert_break(tx, rec.id, user_id, now) {
                Ok(b) => b,
                Err(e) if is_unique_violation(&e) => {
                    return Err(AppError::Conflict(
                        "Cannot start break in current status".into(),
                    ));
                }
                Err(e) => return Err(e),
            };
            store::set_status(tx, rec.id, AttendanceStatus::OnBreak, day.break_minutes)?;
            Ok(interval)
        })?;

        audit(
            &s.pool.conn,
            "break_start",
            &format!("user {}", user_id),
            &format!("Break started on {}", date),
        );
        Ok(interval)
    }

    pub fn end_break(s: &mut Session) -> AppResult<BreakEnded> {
        let date = today(s.now);
        let now = s.now;
        let user_id = s.caller.id;

        let minutes = s.pool.with_tx(|tx| {
            let rec = store::find_for_day(tx, user_id, &date)?
                .ok_or_else(|| AppError::Conflict("Not checked in today".into()))?;
            let open = store::open_break(tx, rec.id)?;
            let mut day = AttendanceDay::from_record(&rec, open.as_ref());
            let minutes = day.end_break(now)?;

            if let Some(b) = open {
                store::close_break(tx, b.id, now, minutes)?;
            }
            store::set_status(tx, rec.id, AttendanceStatus::CheckedIn, day.break_minutes)?;
            Ok(minutes)
        })?;

        audit(
            &s.pool.conn,
            "break_end",
            &format!("user {}", user_id),
            &format!("Break ended after {} min", minutes),
        );
        Ok(BreakEnded {
            break_duration_minutes: minutes,
        })
    }

    /// Check out from `checked_in` or `on_break`; a break still open is closed
    /// at the checkout instant.
    pub fn check_out(s: &mut Session, req: &CheckOutRequest) -> AppResult<AttendanceRecord> {
        let date = today(s.now);
        let now = s.now;
        let user_id = s.caller.id;

        let (id, summary): (i64, CheckoutSummary) = s.pool.with_tx(|tx| {
            let rec = store::find_for_day(tx, user_id, &date)?
                .ok_or_else(|| AppError::Conflict("No check-in found for today".into()))?;
            let open = store::open_break(tx, rec.id)?;
            let mut day = AttendanceDay::from_record(&rec, open.as_ref());
            let summary = day.check_out(now)?;

            if let (Some(b), Some(minutes)) = (open, summary.closed_break_minutes) {
                store::close_break(tx, b.id, now, minutes)?;
            }
            store::apply_checkout(
                tx,
                rec.id,
                &CheckOut {
                    at: now,
                    latitude: req.coords.latitude,
                    longitude: req.coords.longitude,
                    selfie_url: req.selfie_url.as_deref(),
                    break_minutes: summary.break_minutes,
                    working_minutes: summary.working_minutes,
                },
            )?;
            Ok((rec.id, summary))
        })?;

        let conn = &s.pool.conn;
        audit(
            conn,
            "checkout",
            &format!("user {}", user_id),
            &format!(
                "Checked out on {}: worked {}",
                date,
                format_minutes(summary.working_minutes)
            ),
        );

        store::find_by_id(conn, id)?
            .ok_or_else(|| AppError::Other(format!("attendance {} vanished after update", id)))
    }

    /// Today's record with its breaks, or `None`.
    pub fn today(s: &Session) -> AppResult<Option<AttendanceRecord>> {
        let conn = &s.pool.conn;
        match store::find_for_day(conn, s.caller.id, &today(s.now))? {
            Some(mut rec) => {
                rec.breaks = Some(store::breaks_for(conn, rec.id)?);
                Ok(Some(rec))
            }
            None => Ok(None),
        }
    }

    pub fn history(s: &Session, page: PageRequest) -> AppResult<Page<AttendanceRecord>> {
        let conn = &s.pool.conn;
        let (mut rows, total) = store::history(conn, s.caller.id, page.limit, page.offset())?;
        for rec in &mut rows {
            rec.breaks = Some(store::breaks_for(conn, rec.id)?);
        }
        Ok(Page::new(rows, total, page))
    }

    /// Today's organisation roster, scoped to the direct team for supervisors.
    pub fn team(s: &Session, zone_id: Option<i64>) -> AppResult<Vec<TeamAttendance>> {
        s.require(Role::Supervisor)?;
        let rows = store::team_for_day(&s.pool.conn, s.caller.org_id, &today(s.now), zone_id)?;
        Ok(scope_to_team(&s.caller, rows, |r| r.supervisor_id))
    }
}
