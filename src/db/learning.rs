use super::{get_bool, get_enum, get_json, get_opt_ts, get_ts, ts_to_db};
use crate::errors::AppResult;
use crate::models::learning::{LearningMaterial, LearningProgress, MaterialType, NewMaterial};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_material(row: &Row) -> rusqlite::Result<LearningMaterial> {
    Ok(LearningMaterial {
        id: row.get("id")?,
        org_id: row.get("org_id")?,
        created_by: row.get("created_by")?,
        title: row.get("title")?,
        description: row.get("description")?,
        category: row.get("category")?,
        kind: get_enum(row, "type", MaterialType::from_db_str)?,
        file_url: row.get("file_url")?,
        thumbnail_url: row.get("thumbnail_url")?,
        duration_min: row.get("duration_min")?,
        page_count: row.get("page_count")?,
        target_roles: get_json(row, "target_roles")?,
        is_mandatory: get_bool(row, "is_mandatory")?,
        is_active: get_bool(row, "is_active")?,
        published_at: get_ts(row, "published_at")?,
    })
}

fn map_progress(row: &Row) -> rusqlite::Result<LearningProgress> {
    Ok(LearningProgress {
        id: row.get("id")?,
        material_id: row.get("material_id")?,
        user_id: row.get("user_id")?,
        org_id: row.get("org_id")?,
        progress_pct: row.get("progress_pct")?,
        is_completed: get_bool(row, "is_completed")?,
        last_accessed: get_ts(row, "last_accessed")?,
        completed_at: get_opt_ts(row, "completed_at")?,
    })
}

pub fn insert_material(
    conn: &Connection,
    org_id: i64,
    created_by: i64,
    m: &NewMaterial,
    now: DateTime<Utc>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO learning_materials (org_id, created_by, title, description, category, type,
                                         file_url, thumbnail_url, duration_min, page_count,
                                         target_roles, is_mandatory, is_active, published_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, 1, ?13)",
        params![
            org_id,
            created_by,
            m.title,
            m.description,
            m.category,
            m.kind.to_db_str(),
            m.file_url,
            m.thumbnail_url,
            m.duration_min,
            m.page_count,
            serde_json::to_string(&m.target_roles)?,
            m.is_mandatory,
            ts_to_db(&now),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_in_org(conn: &Connection, id: i64, org_id: i64) -> AppResult<Option<LearningMaterial>> {
    let m = conn
        .query_row(
            "SELECT * FROM learning_materials WHERE id = ?1 AND org_id = ?2",
            [id, org_id],
            map_material,
        )
        .optional()?;
    Ok(m)
}

/// Active materials, mandatory first, then most recently published.
pub fn active_for_org(conn: &Connection, org_id: i64) -> AppResult<Vec<LearningMaterial>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM learning_materials
         WHERE org_id = ?1 AND is_active = 1
         ORDER BY is_mandatory DESC, published_at DESC, id DESC",
    )?;
    let rows = stmt.query_map([org_id], map_material)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_progress(
    conn: &Connection,
    material_id: i64,
    user_id: i64,
) -> AppResult<Option<LearningProgress>> {
    let p = conn
        .query_row(
            "SELECT * FROM learning_progress WHERE material_id = ?1 AND user_id = ?2",
            [material_id, user_id],
            map_progress,
        )
        .optional()?;
    Ok(p)
}

/// Insert or update the single progress row for (material, user).
/// `completed_at` is stamped the first time the material is completed.
pub fn upsert_progress(
    conn: &Connection,
    material_id: i64,
    user_id: i64,
    org_id: i64,
    progress_pct: i64,
    is_completed: bool,
    now: DateTime<Utc>,
) -> AppResult<()> {
    let stamp = ts_to_db(&now);
    let completed_at = is_completed.then_some(stamp.as_str());
    conn.execute(
        "INSERT INTO learning_progress (material_id, user_id, org_id, progress_pct, is_completed,
                                        last_accessed, completed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(material_id, user_id) DO UPDATE SET
             progress_pct = excluded.progress_pct,
             is_completed = excluded.is_completed,
             last_accessed = excluded.last_accessed,
             completed_at = CASE
                 WHEN excluded.is_completed = 0 THEN NULL
                 ELSE COALESCE(learning_progress.completed_at, excluded.completed_at)
             END",
        params![
            material_id,
            user_id,
            org_id,
            progress_pct,
            is_completed,
            stamp,
            completed_at
        ],
    )?;
    Ok(())
}
