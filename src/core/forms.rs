//! Dynamic form templates and field-activity submissions.

use crate::core::auth::Session;
use crate::db::attendance;
use crate::db::forms::{self as store, SubmissionFilter};
use crate::db::log::audit;
use crate::errors::{AppError, AppResult};
use crate::models::form::{FormField, FormSubmission, FormTemplate, NewField, NewSubmission, NewTemplate};
use crate::models::role::Role;
use crate::utils::date::today;
use crate::utils::pagination::{Page, PageRequest};
use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use serde_json::{Value, json};

fn field_key_pattern() -> AppResult<Regex> {
    Regex::new(r"^[a-z_]+$").map_err(|e| AppError::Other(e.to_string()))
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitReceipt {
    pub submission_id: i64,
    pub is_converted: bool,
}

fn validate_field(
    key_pattern: &Regex,
    idx: Option<usize>,
    f: &NewField,
    errors: &mut Vec<Value>,
) {
    let prefix = match idx {
        Some(i) => format!("fields[{}].", i),
        None => String::new(),
    };
    if f.label.trim().is_empty() {
        errors.push(json!({ "field": format!("{}label", prefix), "message": "is required" }));
    }
    if !key_pattern.is_match(&f.field_key) {
        errors.push(json!({
            "field": format!("{}field_key", prefix),
            "message": "must contain only lowercase letters and underscores",
        }));
    }
}

fn fail_if_any(errors: Vec<Value>) -> AppResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation_with("Validation failed", json!(errors)))
    }
}

pub struct FormsLogic;

impl FormsLogic {
    pub fn templates(s: &Session, activity_id: Option<&str>) -> AppResult<Vec<FormTemplate>> {
        store::active_templates(&s.pool.conn, s.caller.org_id, activity_id)
    }

    pub fn template(s: &Session, id: i64) -> AppResult<FormTemplate> {
        store::find_template_in_org(&s.pool.conn, id, s.caller.org_id)?
            .ok_or_else(|| AppError::NotFound("Template not found".into()))
    }

    pub fn create_template(s: &mut Session, t: &NewTemplate) -> AppResult<FormTemplate> {
        s.require(Role::CityManager)?;

        let mut errors = Vec::new();
        if t.name.trim().is_empty() {
            errors.push(json!({ "field": "name", "message": "is required" }));
        }
        if t.activity_id.trim().is_empty() {
            errors.push(json!({ "field": "activity_id", "message": "is required" }));
        }
        let key_pattern = field_key_pattern()?;
        for (i, f) in t.fields.iter().enumerate() {
            validate_field(&key_pattern, Some(i), f, &mut errors);
        }
        fail_if_any(errors)?;

        let org_id = s.caller.org_id;
        let created_by = s.caller.id;
        let now = s.now;
        let id = s.pool.with_tx(|tx| {
            let id = store::insert_template(tx, org_id, created_by, t, now)?;
            for f in &t.fields {
                store::insert_field(tx, id, f)?;
            }
            Ok(id)
        })?;

        audit(
            &s.pool.conn,
            "form_template_create",
            &format!("template {}", id),
            &format!("{} with {} field(s)", t.name, t.fields.len()),
        );
        Self::template(s, id)
    }

    pub fn add_field(s: &mut Session, template_id: i64, f: &NewField) -> AppResult<FormField> {
        s.require(Role::CityManager)?;
        let mut errors = Vec::new();
        validate_field(&field_key_pattern()?, None, f, &mut errors);
        fail_if_any(errors)?;

        Self::template(s, template_id)?;
        let conn = &s.pool.conn;
        let id = store::insert_field(conn, template_id, f)?;
        audit(
            conn,
            "form_field_add",
            &format!("template {}", template_id),
            &format!("Field '{}' ({})", f.field_key, f.field_type.to_db_str()),
        );
        store::find_field(conn, id)?
            .ok_or_else(|| AppError::Other(format!("field {} vanished after insert", id)))
    }

    /// Validate required and unknown keys, link today's attendance record and persist the
    /// submission with its responses atomically.
    pub fn submit(s: &mut Session, sub: &NewSubmission) -> AppResult<SubmitReceipt> {
        let template = store::find_template_in_org(&s.pool.conn, sub.template_id, s.caller.org_id)?
            .ok_or_else(|| AppError::NotFound("Form template not found".into()))?;

        let missing: Vec<&str> = template
            .fields
            .iter()
            .filter(|f| f.is_required)
            .map(|f| f.field_key.as_str())
            .filter(|key| !sub.responses.iter().any(|r| r.field_key == *key))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::validation_with(
                format!("Missing required fields: {}", missing.join(", ")),
                json!({ "missing": missing }),
            ));
        }

        // Every answer must belong to one of this template's fields.
        let unknown: Vec<&str> = sub
            .responses
            .iter()
            .filter(|r| {
                !template
                    .fields
                    .iter()
                    .any(|f| f.id == r.field_id && f.field_key == r.field_key)
            })
            .map(|r| r.field_key.as_str())
            .collect();
        if !unknown.is_empty() {
            return Err(AppError::validation_with(
                format!("Unknown fields for this template: {}", unknown.join(", ")),
                json!({ "unknown": unknown }),
            ));
        }

        if let Some(lat) = sub.latitude
            && !(-90.0..=90.0).contains(&lat)
        {
            return Err(AppError::validation("latitude must be between -90 and 90"));
        }
        if let Some(lng) = sub.longitude
            && !(-180.0..=180.0).contains(&lng)
        {
            return Err(AppError::validation("longitude must be between -180 and 180"));
        }

        let org_id = s.caller.org_id;
        let user_id = s.caller.id;
        let now = s.now;
        let date = today(now);

        let id = s.pool.with_tx(|tx| {
            let attendance_id = attendance::id_for_day(tx, user_id, &date)?;
            let id = store::insert_submission(tx, org_id, user_id, attendance_id, sub, now)?;
            for r in &sub.responses {
                store::insert_response(tx, id, r)?;
            }
            Ok(id)
        })?;

        audit(
            &s.pool.conn,
            "form_submit",
            &format!("submission {}", id),
            &format!(
                "Template {} by user {}, {} response(s)",
                sub.template_id,
                user_id,
                sub.responses.len()
            ),
        );
        Ok(SubmitReceipt {
            submission_id: id,
            is_converted: sub.is_converted,
        })
    }

    pub fn my_submissions(
        s: &Session,
        date: Option<NaiveDate>,
        page: PageRequest,
    ) -> AppResult<Page<FormSubmission>> {
        let filter = SubmissionFilter {
            user_id: Some(s.caller.id),
            date,
            activity_id: None,
        };
        let (rows, total) =
            store::list_submissions(&s.pool.conn, s.caller.org_id, &filter, page.limit, page.offset())?;
        Ok(Page::new(rows, total, page))
    }

    /// A single submission: the owner's own, or any in the organisation for
    /// supervisors and above.
    pub fn submission(s: &Session, id: i64) -> AppResult<FormSubmission> {
        let found = store::find_submission_in_org(&s.pool.conn, id, s.caller.org_id)?
            .ok_or_else(|| AppError::NotFound("Submission not found".into()))?;
        if found.user_id != s.caller.id && !s.caller.role.is_management() {
            return Err(AppError::Forbidden("Insufficient permissions".into()));
        }
        Ok(found)
    }

    pub fn all_submissions(
        s: &Session,
        filter: &SubmissionFilter,
        page: PageRequest,
    ) -> AppResult<Page<FormSubmission>> {
        s.require(Role::Supervisor)?;
        let (rows, total) =
            store::list_submissions(&s.pool.conn, s.caller.org_id, filter, page.limit, page.offset())?;
        Ok(Page::new(rows, total, page))
    }
}
