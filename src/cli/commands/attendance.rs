use super::Context;
use crate::cli::parser::AttendanceCmd;
use crate::core::attendance::{AttendanceLogic, CheckInRequest, CheckOutRequest};
use crate::core::calculator::geofence::Coordinates;
use crate::core::storage::{Bucket, ObjectStorage, StoredObject, upload_file};
use crate::errors::AppResult;
use crate::ui::envelope;
use crate::utils::time::format_minutes;
use std::path::Path;

/// Upload a selfie file, if one was given.
fn upload_selfie(
    ctx: &Context,
    file: Option<&Path>,
    org_id: i64,
    user_id: i64,
) -> AppResult<Option<StoredObject>> {
    file.map(|path| upload_file(&ctx.storage(), Bucket::Selfie, path, org_id, user_id))
        .transpose()
}

/// Drop the selfie stored for a transition that was then rejected.
fn discard<T>(
    ctx: &Context,
    stored: Option<StoredObject>,
    result: AppResult<T>,
) -> AppResult<T> {
    if result.is_err()
        && let Some(obj) = stored
        && let Err(e) = ctx.storage().delete(Bucket::Selfie, &obj.path)
    {
        eprintln!("⚠️  could not remove orphaned selfie {}: {}", obj.path, e);
    }
    result
}

pub fn handle(action: &AttendanceCmd, ctx: &Context) -> AppResult<()> {
    match action {
        AttendanceCmd::Checkin {
            lat,
            lng,
            zone,
            selfie,
            selfie_url: url,
            activity,
        } => {
            let coords = Coordinates::new(*lat, *lng)?;
            let mut s = ctx.session()?;
            let stored = upload_selfie(ctx, selfie.as_deref(), s.caller.org_id, s.caller.id)?;
            let req = CheckInRequest {
                coords,
                zone_id: *zone,
                selfie_url: stored.as_ref().map(|o| o.url.clone()).or_else(|| url.clone()),
                activity_id: activity.clone(),
            };
            let record = discard(ctx, stored, AttendanceLogic::check_in(&mut s, &req))?;
            envelope::created(
                &record,
                &format!("Checked in ({}m from meeting point)", record.checkin_distance_m),
            )
        }

        AttendanceCmd::Checkout {
            lat,
            lng,
            selfie,
            selfie_url: url,
        } => {
            let coords = Coordinates::new(*lat, *lng)?;
            let mut s = ctx.session()?;
            let stored = upload_selfie(ctx, selfie.as_deref(), s.caller.org_id, s.caller.id)?;
            let req = CheckOutRequest {
                coords,
                selfie_url: stored.as_ref().map(|o| o.url.clone()).or_else(|| url.clone()),
            };
            let record = discard(ctx, stored, AttendanceLogic::check_out(&mut s, &req))?;
            let worked = format_minutes(record.working_minutes.unwrap_or(0));
            envelope::ok_with(&record, &format!("Checked out. Worked {}", worked))
        }

        AttendanceCmd::BreakStart => {
            let mut s = ctx.session()?;
            let interval = AttendanceLogic::start_break(&mut s)?;
            envelope::ok_with(&interval, "Break started")
        }

        AttendanceCmd::BreakEnd => {
            let mut s = ctx.session()?;
            let ended = AttendanceLogic::end_break(&mut s)?;
            envelope::ok_with(&ended, "Break ended")
        }

        AttendanceCmd::Today => {
            let s = ctx.session()?;
            envelope::ok(&AttendanceLogic::today(&s)?)
        }

        AttendanceCmd::History { page, limit } => {
            let s = ctx.session()?;
            envelope::ok(&AttendanceLogic::history(&s, ctx.page(*page, *limit))?)
        }

        AttendanceCmd::Team { zone } => {
            let s = ctx.session()?;
            envelope::ok(&AttendanceLogic::team(&s, *zone)?)
        }
    }
}
