use super::Context;
use crate::cli::parser::AuthCmd;
use crate::core::auth::AuthLogic;
use crate::errors::AppResult;
use crate::ui::envelope;

pub fn handle(action: &AuthCmd, ctx: &Context) -> AppResult<()> {
    let mut s = ctx.session()?;
    match action {
        AuthCmd::Me => envelope::ok(&AuthLogic::me(&s)?),
        AuthCmd::Logout => {
            AuthLogic::logout(&mut s)?;
            envelope::ok_with(&serde_json::Value::Null, "Logged out successfully")
        }
    }
}
