use super::Context;
use crate::cli::parser::GrievanceCmd;
use crate::core::grievance::{GrievanceLogic, parse_category, parse_review_status};
use crate::errors::{AppError, AppResult};
use crate::models::grievance::{GrievanceStatus, NewGrievance};
use crate::models::role::Role;
use crate::ui::envelope;
use crate::utils::date::parse_optional_date;

pub fn handle(action: &GrievanceCmd, ctx: &Context) -> AppResult<()> {
    match action {
        GrievanceCmd::Submit {
            category,
            description,
            against_role,
            incident_date,
            evidence,
            anonymous,
        } => {
            let against_role = against_role
                .as_deref()
                .map(|r| {
                    Role::from_db_str(r)
                        .ok_or_else(|| AppError::validation(format!("Unknown role '{}'", r)))
                })
                .transpose()?;
            let g = NewGrievance {
                category: parse_category(category)?,
                against_role,
                incident_date: parse_optional_date(incident_date.as_deref())?,
                description: description.clone(),
                evidence_urls: evidence.clone(),
                is_anonymous: *anonymous,
            };
            let mut s = ctx.session()?;
            let receipt = GrievanceLogic::submit(&mut s, &g)?;
            envelope::created(&receipt, "Grievance submitted. HR will review within 48 hours.")
        }

        GrievanceCmd::Mine => {
            let s = ctx.session()?;
            envelope::ok(&GrievanceLogic::mine(&s)?)
        }

        GrievanceCmd::All {
            status,
            page,
            limit,
        } => {
            let status = status
                .as_deref()
                .map(|st| {
                    GrievanceStatus::from_db_str(st)
                        .ok_or_else(|| AppError::validation(format!("Unknown status '{}'", st)))
                })
                .transpose()?;
            let s = ctx.session()?;
            envelope::ok(&GrievanceLogic::all(&s, status, ctx.page(*page, *limit))?)
        }

        GrievanceCmd::Update {
            id,
            status,
            resolution,
        } => {
            let status = parse_review_status(status)?;
            let mut s = ctx.session()?;
            let updated = GrievanceLogic::update(&mut s, *id, status, resolution.as_deref())?;
            envelope::ok_with(&updated, "Status updated")
        }
    }
}
