use crate::core::auth::Session;
use crate::core::visibility::redact_anonymous;
use crate::db::grievances as store;
use crate::db::log::audit;
use crate::errors::{AppError, AppResult};
use crate::models::grievance::{Grievance, GrievanceCategory, GrievanceStatus, NewGrievance};
use crate::models::role::Role;
use crate::utils::pagination::{Page, PageRequest};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

pub const MIN_DESCRIPTION_CHARS: usize = 20;

/// What the submitter gets back: enough to follow the case up.
#[derive(Debug, Clone, Serialize)]
pub struct GrievanceReceipt {
    pub id: i64,
    pub reference_no: String,
    pub status: GrievanceStatus,
    pub created_at: DateTime<Utc>,
}

pub fn parse_category(s: &str) -> AppResult<GrievanceCategory> {
    GrievanceCategory::from_db_str(s).ok_or_else(|| {
        let allowed: Vec<&str> = GrievanceCategory::ALL.iter().map(|c| c.to_db_str()).collect();
        AppError::validation_with(
            "Validation failed",
            json!([{ "field": "category", "message": format!("must be one of: {}", allowed.join(", ")) }]),
        )
    })
}

/// Review statuses an administrator may set.
pub fn parse_review_status(s: &str) -> AppResult<GrievanceStatus> {
    match GrievanceStatus::from_db_str(s) {
        Some(st) if st != GrievanceStatus::Submitted => Ok(st),
        _ => Err(AppError::validation_with(
            "Validation failed",
            json!([{ "field": "status", "message": "must be one of: under_review, resolved, dismissed" }]),
        )),
    }
}

pub struct GrievanceLogic;

impl GrievanceLogic {
    pub fn submit(s: &mut Session, g: &NewGrievance) -> AppResult<GrievanceReceipt> {
        if g.description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
            return Err(AppError::validation_with(
                "Validation failed",
                json!([{
                    "field": "description",
                    "message": format!("must be at least {} characters", MIN_DESCRIPTION_CHARS),
                }]),
            ));
        }

        let org_id = s.caller.org_id;
        let user_id = s.caller.id;
        let now = s.now;
        let id = s
            .pool
            .with_tx(|tx| store::insert_grievance(tx, org_id, user_id, g, now))?;

        let conn = &s.pool.conn;
        let saved = store::find_in_org(conn, id, org_id)?
            .ok_or_else(|| AppError::Other(format!("grievance {} vanished after insert", id)))?;
        // Anonymous submissions are logged without the submitter.
        let target = if g.is_anonymous {
            "anonymous".to_string()
        } else {
            format!("user {}", user_id)
        };
        audit(
            conn,
            "grievance_submit",
            &target,
            &format!("{} ({})", saved.reference_no, g.category.to_db_str()),
        );

        Ok(GrievanceReceipt {
            id: saved.id,
            reference_no: saved.reference_no,
            status: saved.status,
            created_at: saved.created_at,
        })
    }

    /// The caller's own grievances, anonymous ones included and unredacted.
    pub fn mine(s: &Session) -> AppResult<Vec<Grievance>> {
        store::mine(&s.pool.conn, s.caller.id)
    }

    pub fn all(
        s: &Session,
        status: Option<GrievanceStatus>,
        page: PageRequest,
    ) -> AppResult<Page<Grievance>> {
        s.require(Role::CityManager)?;
        let (rows, total) =
            store::all_for_org(&s.pool.conn, s.caller.org_id, status, page.limit, page.offset())?;
        Ok(Page::new(redact_anonymous(rows), total, page))
    }

    pub fn update(
        s: &mut Session,
        id: i64,
        status: GrievanceStatus,
        resolution: Option<&str>,
    ) -> AppResult<Grievance> {
        s.require(Role::CityManager)?;
        let org_id = s.caller.org_id;
        let reviewer = s.caller.id;
        let now = s.now;

        s.pool.with_tx(|tx| {
            store::find_in_org(tx, id, org_id)?
                .ok_or_else(|| AppError::NotFound("Grievance not found".into()))?;
            store::update_status(tx, id, status, resolution, reviewer, now)
        })?;

        let conn = &s.pool.conn;
        audit(
            conn,
            "grievance_update",
            &format!("grievance {}", id),
            &format!("Status → {}", status.to_db_str()),
        );
        let updated = store::find_in_org(conn, id, org_id)?
            .ok_or_else(|| AppError::NotFound("Grievance not found".into()))?;
        Ok(redact_anonymous(vec![updated]).remove(0))
    }
}
