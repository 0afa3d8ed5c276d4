//! Broadcast quizzes: questions pushed to a set of roles, one answer each.

use crate::core::auth::Session;
use crate::core::visibility::mask_answer_key;
use crate::db::broadcast as store;
use crate::db::is_unique_violation;
use crate::db::log::audit;
use crate::errors::{AppError, AppResult};
use crate::models::broadcast::{
    AnswerReceipt, BroadcastQuestion, NewQuestion, OptionTally, QuestionResults, QuestionStatus,
    QuestionView,
};
use crate::models::role::Role;
use serde_json::{Value, json};

pub const MIN_QUESTION_CHARS: usize = 5;
pub const MIN_OPTIONS: usize = 2;

fn validate(q: &NewQuestion) -> AppResult<()> {
    let mut errors: Vec<Value> = Vec::new();
    if q.question.trim().chars().count() < MIN_QUESTION_CHARS {
        errors.push(json!({
            "field": "question",
            "message": format!("must be at least {} characters", MIN_QUESTION_CHARS),
        }));
    }
    if q.options.len() < MIN_OPTIONS {
        errors.push(json!({
            "field": "options",
            "message": format!("at least {} options are required", MIN_OPTIONS),
        }));
    }
    if let Some(idx) = q.correct_option
        && (idx < 0 || idx as usize >= q.options.len())
    {
        errors.push(json!({ "field": "correct_option", "message": "must index one of the options" }));
    }
    for role in &q.target_roles {
        if Role::from_db_str(role).is_none() {
            errors.push(json!({ "field": "target_roles", "message": format!("unknown role '{}'", role) }));
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation_with("Validation failed", json!(errors)))
    }
}

pub struct BroadcastLogic;

impl BroadcastLogic {
    pub fn create(s: &mut Session, q: &NewQuestion) -> AppResult<BroadcastQuestion> {
        s.require(Role::CityManager)?;
        validate(q)?;

        let conn = &s.pool.conn;
        let id = store::insert_question(conn, s.caller.org_id, s.caller.id, q, s.now)?;
        audit(
            conn,
            "broadcast_create",
            &format!("question {}", id),
            &format!("{} option(s), urgent: {}", q.options.len(), q.is_urgent),
        );
        find(s, id)
    }

    /// Active questions targeted at the caller's role, answer key masked for
    /// non-administrative roles.
    pub fn list(s: &Session) -> AppResult<Vec<QuestionView>> {
        let conn = &s.pool.conn;
        let role = s.caller.role;
        let mut out = Vec::new();
        for q in store::active_for_org(conn, s.caller.org_id)? {
            if !q.target_roles.iter().any(|r| r == role.to_db_str()) {
                continue;
            }
            let my_answer = store::find_answer(conn, q.id, s.caller.id)?;
            out.push(QuestionView {
                already_answered: my_answer.is_some(),
                my_answer,
                question: mask_answer_key(role, q),
            });
        }
        Ok(out)
    }

    pub fn answer(s: &mut Session, question_id: i64, selected: i64) -> AppResult<AnswerReceipt> {
        let q = find(s, question_id)?;
        if q.status != QuestionStatus::Active {
            return Err(AppError::validation("Question is no longer active"));
        }
        if let Some(deadline) = q.deadline_at
            && deadline < s.now
        {
            return Err(AppError::validation("Deadline has passed"));
        }

        let conn = &s.pool.conn;
        if store::find_answer(conn, question_id, s.caller.id)?.is_some() {
            return Err(AppError::Conflict("Already answered this question".into()));
        }
        if selected < 0 || selected as usize >= q.options.len() {
            return Err(AppError::validation("Invalid option index"));
        }

        let is_correct = q.correct_option.map(|c| c == selected);
        let answer = match store::insert_answer(
            conn,
            question_id,
            s.caller.id,
            s.caller.org_id,
            selected,
            is_correct,
            s.now,
        ) {
            Ok(a) => a,
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::Conflict("Already answered this question".into()));
            }
            Err(e) => return Err(e),
        };

        audit(
            conn,
            "broadcast_answer",
            &format!("question {}", question_id),
            &format!("User {} selected option {}", s.caller.id, selected),
        );
        Ok(AnswerReceipt {
            answer,
            correct_option: q.correct_option,
        })
    }

    pub fn results(s: &Session, question_id: i64) -> AppResult<QuestionResults> {
        s.require(Role::CityManager)?;
        let question = find(s, question_id)?;
        let answers = store::answers_for(&s.pool.conn, question_id)?;

        let tally = question
            .options
            .iter()
            .enumerate()
            .map(|(index, option)| OptionTally {
                option: option.clone(),
                index,
                count: answers.iter().filter(|a| a.selected == index as i64).count(),
            })
            .collect();

        Ok(QuestionResults {
            total_answers: answers.len(),
            question,
            answers,
            tally,
        })
    }

    pub fn close(s: &mut Session, question_id: i64) -> AppResult<BroadcastQuestion> {
        s.require(Role::CityManager)?;
        find(s, question_id)?;
        let conn = &s.pool.conn;
        store::set_status(conn, question_id, QuestionStatus::Closed)?;
        audit(conn, "broadcast_close", &format!("question {}", question_id), "Question closed");
        find(s, question_id)
    }
}

fn find(s: &Session, id: i64) -> AppResult<BroadcastQuestion> {
    store::find_in_org(&s.pool.conn, id, s.caller.org_id)?
        .ok_or_else(|| AppError::NotFound("Question not found".into()))
}
