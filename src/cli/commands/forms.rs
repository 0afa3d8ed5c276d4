use super::{Context, read_body};
use crate::cli::parser::FormsCmd;
use crate::core::forms::FormsLogic;
use crate::db::forms::SubmissionFilter;
use crate::errors::AppResult;
use crate::models::form::{NewField, NewSubmission, NewTemplate};
use crate::ui::envelope;
use crate::utils::date::parse_optional_date;

pub fn handle(action: &FormsCmd, ctx: &Context) -> AppResult<()> {
    match action {
        FormsCmd::Templates { activity } => {
            let s = ctx.session()?;
            envelope::ok(&FormsLogic::templates(&s, activity.as_deref())?)
        }

        FormsCmd::Template { id } => {
            let s = ctx.session()?;
            envelope::ok(&FormsLogic::template(&s, *id)?)
        }

        FormsCmd::CreateTemplate { body } => {
            let t: NewTemplate = read_body(body)?;
            let mut s = ctx.session()?;
            envelope::created(&FormsLogic::create_template(&mut s, &t)?, "Template created")
        }

        FormsCmd::AddField { template, body } => {
            let f: NewField = read_body(body)?;
            let mut s = ctx.session()?;
            envelope::created(&FormsLogic::add_field(&mut s, *template, &f)?, "Field added")
        }

        FormsCmd::Submit { body } => {
            let sub: NewSubmission = read_body(body)?;
            let mut s = ctx.session()?;
            envelope::created(&FormsLogic::submit(&mut s, &sub)?, "Form submitted successfully")
        }

        FormsCmd::Submissions { date, page, limit } => {
            let date = parse_optional_date(date.as_deref())?;
            let s = ctx.session()?;
            envelope::ok(&FormsLogic::my_submissions(&s, date, ctx.page(*page, *limit))?)
        }

        FormsCmd::Submission { id } => {
            let s = ctx.session()?;
            envelope::ok(&FormsLogic::submission(&s, *id)?)
        }

        FormsCmd::All {
            date,
            activity,
            user,
            page,
            limit,
        } => {
            let filter = SubmissionFilter {
                user_id: *user,
                date: parse_optional_date(date.as_deref())?,
                activity_id: activity.as_deref(),
            };
            let s = ctx.session()?;
            envelope::ok(&FormsLogic::all_submissions(&s, &filter, ctx.page(*page, *limit))?)
        }
    }
}
