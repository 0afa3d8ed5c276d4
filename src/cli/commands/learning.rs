use super::{Context, read_body};
use crate::cli::parser::LearningCmd;
use crate::core::learning::LearningLogic;
use crate::errors::AppResult;
use crate::models::learning::NewMaterial;
use crate::ui::envelope;

pub fn handle(action: &LearningCmd, ctx: &Context) -> AppResult<()> {
    match action {
        LearningCmd::List => {
            let s = ctx.session()?;
            envelope::ok(&LearningLogic::list(&s)?)
        }

        LearningCmd::Create { body } => {
            let m: NewMaterial = read_body(body)?;
            let mut s = ctx.session()?;
            envelope::created(&LearningLogic::create(&mut s, &m)?, "Material published")
        }

        LearningCmd::Progress { id, pct, completed } => {
            let mut s = ctx.session()?;
            let progress = LearningLogic::progress(&mut s, *id, *pct, *completed)?;
            envelope::ok_with(&progress, "Progress saved")
        }
    }
}
