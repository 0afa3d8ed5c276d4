use super::Context;
use crate::cli::parser::SosCmd;
use crate::core::calculator::geofence::Coordinates;
use crate::core::sos::{SosLogic, TriggerRequest};
use crate::errors::{AppError, AppResult};
use crate::models::sos::SosStatus;
use crate::ui::envelope;

pub fn handle(action: &SosCmd, ctx: &Context) -> AppResult<()> {
    match action {
        SosCmd::Trigger {
            lat,
            lng,
            address,
            message,
        } => {
            let req = TriggerRequest {
                coords: Coordinates::new(*lat, *lng)?,
                address: address.clone(),
                message: message.clone(),
            };
            let mut s = ctx.session()?;
            let alert = SosLogic::trigger(&mut s, &req)?;
            let msg = format!(
                "SOS sent. {} responder(s) notified",
                alert.notified_user_ids.ids().len()
            );
            envelope::created(&alert, &msg)
        }

        SosCmd::Ack { id } => {
            let mut s = ctx.session()?;
            envelope::ok_with(&SosLogic::acknowledge(&mut s, *id)?, "Alert acknowledged")
        }

        SosCmd::Resolve { id, notes } => {
            let mut s = ctx.session()?;
            envelope::ok_with(
                &SosLogic::resolve(&mut s, *id, notes.as_deref())?,
                "Alert resolved",
            )
        }

        SosCmd::List { status } => {
            let status = status
                .as_deref()
                .map(|st| {
                    SosStatus::from_db_str(st).ok_or_else(|| {
                        AppError::validation("status must be one of: active, acknowledged, resolved")
                    })
                })
                .transpose()?;
            let s = ctx.session()?;
            envelope::ok(&SosLogic::list(&s, status)?)
        }
    }
}
