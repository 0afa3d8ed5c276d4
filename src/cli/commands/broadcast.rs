use super::{Context, read_body};
use crate::cli::parser::BroadcastCmd;
use crate::core::broadcast::BroadcastLogic;
use crate::errors::AppResult;
use crate::models::broadcast::NewQuestion;
use crate::ui::envelope;

pub fn handle(action: &BroadcastCmd, ctx: &Context) -> AppResult<()> {
    match action {
        BroadcastCmd::List => {
            let s = ctx.session()?;
            envelope::ok(&BroadcastLogic::list(&s)?)
        }

        BroadcastCmd::Create { body } => {
            let q: NewQuestion = read_body(body)?;
            let mut s = ctx.session()?;
            envelope::created(&BroadcastLogic::create(&mut s, &q)?, "Question posted")
        }

        BroadcastCmd::Answer { id, option } => {
            let mut s = ctx.session()?;
            envelope::created(&BroadcastLogic::answer(&mut s, *id, *option)?, "Answer submitted")
        }

        BroadcastCmd::Results { id } => {
            let s = ctx.session()?;
            envelope::ok(&BroadcastLogic::results(&s, *id)?)
        }

        BroadcastCmd::Close { id } => {
            let mut s = ctx.session()?;
            envelope::ok_with(&BroadcastLogic::close(&mut s, *id)?, "Question closed")
        }
    }
}
