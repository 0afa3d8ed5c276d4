use super::Context;
use crate::cli::parser::LeaderboardCmd;
use crate::core::leaderboard::{LeaderboardLogic, clamp_limit, parse_period};
use crate::errors::AppResult;
use crate::ui::envelope;

pub fn handle(action: &LeaderboardCmd, ctx: &Context) -> AppResult<()> {
    let default_period = ctx.cfg.default_leaderboard_period.as_str();
    match action {
        LeaderboardCmd::Show {
            period,
            limit,
            zone,
        } => {
            let kind = parse_period(period.as_deref().unwrap_or(default_period))?;
            let limit = clamp_limit(*limit, ctx.cfg.leaderboard_limit, ctx.cfg.max_leaderboard_limit);
            let s = ctx.session()?;
            envelope::ok(&LeaderboardLogic::show(&s, kind, limit, *zone)?)
        }

        LeaderboardCmd::Me { period } => {
            let kind = parse_period(period.as_deref().unwrap_or(default_period))?;
            let s = ctx.session()?;
            envelope::ok(&LeaderboardLogic::me(&s, kind)?)
        }
    }
}
