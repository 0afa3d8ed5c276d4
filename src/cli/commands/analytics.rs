use super::Context;
use crate::cli::parser::AnalyticsCmd;
use crate::core::analytics::AnalyticsLogic;
use crate::errors::AppResult;
use crate::ui::envelope;
use crate::utils::date::{date_or, today};

pub fn handle(action: &AnalyticsCmd, ctx: &Context) -> AppResult<()> {
    let s = ctx.session()?;
    match action {
        AnalyticsCmd::Summary { date } => {
            let date = date_or(date.as_deref(), today(s.now))?;
            envelope::ok(&AnalyticsLogic::summary(&s, date)?)
        }
        AnalyticsCmd::Feed { limit } => envelope::ok(&AnalyticsLogic::activity_feed(&s, *limit)?),
        AnalyticsCmd::Hourly { date } => {
            let date = date_or(date.as_deref(), today(s.now))?;
            envelope::ok(&AnalyticsLogic::hourly(&s, date)?)
        }
    }
}
