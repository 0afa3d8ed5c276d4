use super::{Context, read_body};
use crate::cli::parser::ZonesCmd;
use crate::core::calculator::geofence::Coordinates;
use crate::core::zones::{DEFAULT_GEOFENCE_RADIUS_M, ZonesLogic};
use crate::errors::AppResult;
use crate::models::zone::NewZone;
use crate::ui::envelope;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ZoneBody {
    name: String,
    #[serde(default)]
    city: Option<String>,
    meeting_lat: f64,
    meeting_lng: f64,
    #[serde(default)]
    meeting_address: Option<String>,
    #[serde(default)]
    geofence_radius: Option<i64>,
}

pub fn handle(action: &ZonesCmd, ctx: &Context) -> AppResult<()> {
    match action {
        ZonesCmd::List => {
            let s = ctx.session()?;
            envelope::ok(&ZonesLogic::list(&s)?)
        }

        ZonesCmd::Create { body } => {
            let body: ZoneBody = read_body(body)?;
            let zone = NewZone {
                org_id: 0,
                name: body.name,
                city: body.city,
                meeting_point: Coordinates::new(body.meeting_lat, body.meeting_lng)?,
                meeting_address: body.meeting_address,
                geofence_radius: body.geofence_radius.unwrap_or(DEFAULT_GEOFENCE_RADIUS_M),
            };
            let s = ctx.session()?;
            envelope::created(&ZonesLogic::create(&s, &zone)?, "Zone created")
        }
    }
}
