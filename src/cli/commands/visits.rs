use super::Context;
use crate::cli::parser::VisitsCmd;
use crate::core::calculator::geofence::Coordinates;
use crate::core::visits::{LogVisitRequest, VisitsLogic};
use crate::errors::{AppError, AppResult};
use crate::models::visit::VisitRating;
use crate::ui::envelope;
use crate::utils::date::{date_or, parse_optional_date, today};

pub fn handle(action: &VisitsCmd, ctx: &Context) -> AppResult<()> {
    match action {
        VisitsCmd::Log {
            executive,
            rating,
            remarks,
            photo_url,
            lat,
            lng,
        } => {
            let rating = VisitRating::from_db_str(rating).ok_or_else(|| {
                AppError::validation("rating must be one of: excellent, good, average, poor")
            })?;
            let coords = match (lat, lng) {
                (Some(lat), Some(lng)) => Some(Coordinates::new(*lat, *lng)?),
                _ => None,
            };
            let req = LogVisitRequest {
                executive_id: *executive,
                rating,
                remarks: remarks.clone(),
                photo_url: photo_url.clone(),
                coords,
            };
            let s = ctx.session()?;
            envelope::created(&VisitsLogic::log(&s, &req)?, "Visit logged")
        }

        VisitsCmd::Mine { date } => {
            let date = parse_optional_date(date.as_deref())?;
            let s = ctx.session()?;
            envelope::ok(&VisitsLogic::mine(&s, date)?)
        }

        VisitsCmd::Team { date } => {
            let s = ctx.session()?;
            let date = date_or(date.as_deref(), today(s.now))?;
            envelope::ok(&VisitsLogic::team(&s, date)?)
        }
    }
}
