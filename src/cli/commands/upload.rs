use super::Context;
use crate::core::storage::{Bucket, upload_file};
use crate::errors::AppResult;
use crate::ui::envelope;
use std::path::Path;

pub fn handle(kind: &str, file: &Path, ctx: &Context) -> AppResult<()> {
    let bucket = Bucket::from_kind(kind)?;
    let s = ctx.session()?;
    let stored = upload_file(&ctx.storage(), bucket, file, s.caller.org_id, s.caller.id)?;
    envelope::created(&stored, "File uploaded")
}
