use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    CheckedIn,
    OnBreak,
    CheckedOut,
}

impl AttendanceStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AttendanceStatus::CheckedIn => "checked_in",
            AttendanceStatus::OnBreak => "on_break",
            AttendanceStatus::CheckedOut => "checked_out",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "checked_in" => Some(AttendanceStatus::CheckedIn),
            "on_break" => Some(AttendanceStatus::OnBreak),
            "checked_out" => Some(AttendanceStatus::CheckedOut),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub user_id: i64,
    pub org_id: i64,
    pub zone_id: Option<i64>,
    pub activity_id: Option<String>,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub checkin_at: DateTime<Utc>,
    pub checkin_lat: f64,
    pub checkin_lng: f64,
    pub checkin_selfie_url: Option<String>,
    pub checkin_distance_m: i64,
    pub checkout_at: Option<DateTime<Utc>>,
    pub checkout_lat: Option<f64>,
    pub checkout_lng: Option<f64>,
    pub checkout_selfie_url: Option<String>,
    pub break_minutes: i64,
    pub working_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breaks: Option<Vec<BreakInterval>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BreakInterval {
    pub id: i64,
    pub attendance_id: i64,
    pub user_id: i64,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
}

impl BreakInterval {
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

/// Row of the team view: a record joined with its owner.
#[derive(Debug, Clone, Serialize)]
pub struct TeamAttendance {
    #[serde(flatten)]
    pub record: AttendanceRecord,
    pub user_name: String,
    pub employee_id: Option<String>,
    #[serde(skip)]
    pub supervisor_id: Option<i64>,
}
