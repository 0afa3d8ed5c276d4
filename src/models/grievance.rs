use super::role::Role;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrievanceCategory {
    HarassmentMisconduct,
    UnfairTreatment,
    PaymentSalary,
    StockSupply,
    WorkEnvironment,
    SupervisorConduct,
    Other,
}

impl GrievanceCategory {
    pub const ALL: [GrievanceCategory; 7] = [
        GrievanceCategory::HarassmentMisconduct,
        GrievanceCategory::UnfairTreatment,
        GrievanceCategory::PaymentSalary,
        GrievanceCategory::StockSupply,
        GrievanceCategory::WorkEnvironment,
        GrievanceCategory::SupervisorConduct,
        GrievanceCategory::Other,
    ];

    pub fn to_db_str(&self) -> &'static str {
        match self {
            GrievanceCategory::HarassmentMisconduct => "harassment_misconduct",
            GrievanceCategory::UnfairTreatment => "unfair_treatment",
            GrievanceCategory::PaymentSalary => "payment_salary",
            GrievanceCategory::StockSupply => "stock_supply",
            GrievanceCategory::WorkEnvironment => "work_environment",
            GrievanceCategory::SupervisorConduct => "supervisor_conduct",
            GrievanceCategory::Other => "other",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.to_db_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrievanceStatus {
    Submitted,
    UnderReview,
    Resolved,
    Dismissed,
}

impl GrievanceStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            GrievanceStatus::Submitted => "submitted",
            GrievanceStatus::UnderReview => "under_review",
            GrievanceStatus::Resolved => "resolved",
            GrievanceStatus::Dismissed => "dismissed",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "submitted" => Some(GrievanceStatus::Submitted),
            "under_review" => Some(GrievanceStatus::UnderReview),
            "resolved" => Some(GrievanceStatus::Resolved),
            "dismissed" => Some(GrievanceStatus::Dismissed),
            _ => None,
        }
    }
}

/// Joined profile of the submitter, shown in the admin listing.
#[derive(Debug, Clone, Serialize)]
pub struct Submitter {
    pub name: String,
    pub employee_id: Option<String>,
    pub role: Role,
    pub zone_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Grievance {
    pub id: i64,
    pub reference_no: String,
    pub org_id: i64,
    pub submitted_by: Option<i64>,
    pub category: GrievanceCategory,
    pub against_role: Option<Role>,
    pub incident_date: Option<NaiveDate>,
    pub description: String,
    pub evidence_urls: Vec<String>,
    pub is_anonymous: bool,
    pub status: GrievanceStatus,
    pub resolution: Option<String>,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub submitter: Option<Submitter>,
}

#[derive(Debug, Clone)]
pub struct NewGrievance {
    pub category: GrievanceCategory,
    pub against_role: Option<Role>,
    pub incident_date: Option<NaiveDate>,
    pub description: String,
    pub evidence_urls: Vec<String>,
    pub is_anonymous: bool,
}
