use crate::core::auth::Session;
use crate::db::learning as store;
use crate::db::log::audit;
use crate::errors::{AppError, AppResult};
use crate::models::learning::{LearningMaterial, LearningProgress, MaterialView, NewMaterial};
use crate::models::role::Role;
use serde_json::json;

pub struct LearningLogic;

impl LearningLogic {
    pub fn create(s: &mut Session, m: &NewMaterial) -> AppResult<LearningMaterial> {
        s.require(Role::CityManager)?;
        if m.title.trim().is_empty() || m.file_url.trim().is_empty() {
            return Err(AppError::validation_with(
                "Validation failed",
                json!([{ "field": "title/file_url", "message": "title and file_url are required" }]),
            ));
        }

        let conn = &s.pool.conn;
        let id = store::insert_material(conn, s.caller.org_id, s.caller.id, m, s.now)?;
        audit(
            conn,
            "learning_create",
            &format!("material {}", id),
            &format!("{} ({})", m.title, m.kind.to_db_str()),
        );
        store::find_in_org(conn, id, s.caller.org_id)?
            .ok_or_else(|| AppError::Other(format!("material {} vanished after insert", id)))
    }

    /// Active materials aimed at the caller's role, with the caller's progress.
    pub fn list(s: &Session) -> AppResult<Vec<MaterialView>> {
        let conn = &s.pool.conn;
        let role = s.caller.role.to_db_str();
        let mut out = Vec::new();
        for material in store::active_for_org(conn, s.caller.org_id)? {
            if !material.target_roles.iter().any(|r| r == role) {
                continue;
            }
            let my_progress = store::find_progress(conn, material.id, s.caller.id)?;
            out.push(MaterialView {
                material,
                my_progress,
            });
        }
        Ok(out)
    }

    pub fn progress(
        s: &mut Session,
        material_id: i64,
        progress_pct: i64,
        is_completed: bool,
    ) -> AppResult<LearningProgress> {
        if !(0..=100).contains(&progress_pct) {
            return Err(AppError::validation_with(
                "Validation failed",
                json!([{ "field": "progress_pct", "message": "must be between 0 and 100" }]),
            ));
        }

        let conn = &s.pool.conn;
        store::find_in_org(conn, material_id, s.caller.org_id)?
            .ok_or_else(|| AppError::NotFound("Material not found".into()))?;

        store::upsert_progress(
            conn,
            material_id,
            s.caller.id,
            s.caller.org_id,
            progress_pct,
            is_completed,
            s.now,
        )?;
        store::find_progress(conn, material_id, s.caller.id)?
            .ok_or_else(|| AppError::Other("progress row missing after upsert".into()))
    }
}
