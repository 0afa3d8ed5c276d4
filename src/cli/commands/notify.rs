use super::Context;
use crate::cli::parser::NotifyCmd;
use crate::core::notifications::NotificationLogic;
use crate::errors::AppResult;
use crate::ui::envelope;

pub fn handle(action: &NotifyCmd, ctx: &Context) -> AppResult<()> {
    match action {
        NotifyCmd::List {
            unread,
            page,
            limit,
        } => {
            let s = ctx.session()?;
            envelope::ok(&NotificationLogic::list(&s, *unread, ctx.page(*page, *limit))?)
        }
        NotifyCmd::Read { id } => {
            let mut s = ctx.session()?;
            envelope::ok(&NotificationLogic::mark_read(&mut s, *id)?)
        }
        NotifyCmd::ReadAll => {
            let mut s = ctx.session()?;
            envelope::ok(&NotificationLogic::mark_all_read(&mut s)?)
        }
        NotifyCmd::PushToken { push_token } => {
            let mut s = ctx.session()?;
            NotificationLogic::set_push_token(&mut s, push_token)?;
            envelope::ok_with(&serde_json::Value::Null, "Push token saved")
        }
    }
}
