use super::{get_bool, get_enum, get_json, get_opt_bool, get_opt_ts, get_ts, ts_to_db};
use crate::errors::AppResult;
use crate::models::broadcast::{BroadcastAnswer, BroadcastQuestion, NewQuestion, QuestionStatus};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_question(row: &Row) -> rusqlite::Result<BroadcastQuestion> {
    Ok(BroadcastQuestion {
        id: row.get("id")?,
        org_id: row.get("org_id")?,
        created_by: row.get("created_by")?,
        question: row.get("question")?,
        options: get_json(row, "options")?,
        correct_option: row.get("correct_option")?,
        is_urgent: get_bool(row, "is_urgent")?,
        deadline_at: get_opt_ts(row, "deadline_at")?,
        target_roles: get_json(row, "target_roles")?,
        target_zone_ids: get_json(row, "target_zone_ids")?,
        status: get_enum(row, "status", QuestionStatus::from_db_str)?,
        created_at: get_ts(row, "created_at")?,
    })
}

fn map_answer(row: &Row) -> rusqlite::Result<BroadcastAnswer> {
    Ok(BroadcastAnswer {
        id: row.get("id")?,
        question_id: row.get("question_id")?,
        user_id: row.get("user_id")?,
        org_id: row.get("org_id")?,
        selected: row.get("selected")?,
        is_correct: get_opt_bool(row, "is_correct")?,
        answered_at: get_ts(row, "answered_at")?,
    })
}

pub fn insert_question(
    conn: &Connection,
    org_id: i64,
    created_by: i64,
    q: &NewQuestion,
    now: DateTime<Utc>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO broadcast_questions (org_id, created_by, question, options, correct_option,
                                          is_urgent, deadline_at, target_roles, target_zone_ids,
                                          status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            org_id,
            created_by,
            q.question,
            serde_json::to_string(&q.options)?,
            q.correct_option,
            q.is_urgent,
            q.deadline_at.as_ref().map(ts_to_db),
            serde_json::to_string(&q.target_roles)?,
            serde_json::to_string(&q.target_zone_ids)?,
            QuestionStatus::Active.to_db_str(),
            ts_to_db(&now),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_in_org(conn: &Connection, id: i64, org_id: i64) -> AppResult<Option<BroadcastQuestion>> {
    let q = conn
        .query_row(
            "SELECT * FROM broadcast_questions WHERE id = ?1 AND org_id = ?2",
            [id, org_id],
            map_question,
        )
        .optional()?;
    Ok(q)
}

/// Active questions of the organisation, urgent first, then newest.
/// Role targeting is applied by the caller.
pub fn active_for_org(conn: &Connection, org_id: i64) -> AppResult<Vec<BroadcastQuestion>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM broadcast_questions
         WHERE org_id = ?1 AND status = ?2
         ORDER BY is_urgent DESC, created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map(
        params![org_id, QuestionStatus::Active.to_db_str()],
        map_question,
    )?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_answer(
    conn: &Connection,
    question_id: i64,
    user_id: i64,
    org_id: i64,
    selected: i64,
    is_correct: Option<bool>,
    now: DateTime<Utc>,
) -> AppResult<BroadcastAnswer> {
    conn.execute(
        "INSERT INTO broadcast_answers (question_id, user_id, org_id, selected, is_correct, answered_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            question_id,
            user_id,
            org_id,
            selected,
            is_correct,
            ts_to_db(&now)
        ],
    )?;
    Ok(BroadcastAnswer {
        id: conn.last_insert_rowid(),
        question_id,
        user_id,
        org_id,
        selected,
        is_correct,
        answered_at: now,
    })
}

pub fn find_answer(
    conn: &Connection,
    question_id: i64,
    user_id: i64,
) -> AppResult<Option<BroadcastAnswer>> {
    let a = conn
        .query_row(
            "SELECT * FROM broadcast_answers WHERE question_id = ?1 AND user_id = ?2",
            [question_id, user_id],
            map_answer,
        )
        .optional()?;
    Ok(a)
}

pub fn answers_for(conn: &Connection, question_id: i64) -> AppResult<Vec<BroadcastAnswer>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM broadcast_answers WHERE question_id = ?1 ORDER BY answered_at ASC, id ASC",
    )?;
    let rows = stmt.query_map([question_id], map_answer)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn set_status(conn: &Connection, id: i64, status: QuestionStatus) -> AppResult<()> {
    conn.execute(
        "UPDATE broadcast_questions SET status = ?1 WHERE id = ?2",
        params![status.to_db_str(), id],
    )?;
    Ok(())
}
