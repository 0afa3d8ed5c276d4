use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SosStatus {
    Active,
    Acknowledged,
    Resolved,
}

impl SosStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SosStatus::Active => "active",
            SosStatus::Acknowledged => "acknowledged",
            SosStatus::Resolved => "resolved",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(SosStatus::Active),
            "acknowledged" => Some(SosStatus::Acknowledged),
            "resolved" => Some(SosStatus::Resolved),
            _ => None,
        }
    }

    /// Forward-only: active → acknowledged → resolved, or active → resolved.
    pub fn can_advance_to(&self, next: SosStatus) -> bool {
        matches!(
            (self, next),
            (SosStatus::Active, SosStatus::Acknowledged)
                | (SosStatus::Active, SosStatus::Resolved)
                | (SosStatus::Acknowledged, SosStatus::Resolved)
        )
    }
}

/// Recipients captured when the alert was raised. Never re-queried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NotifiedSnapshot(Vec<i64>);

impl NotifiedSnapshot {
    /// Build the snapshot: the supervisor first, then managers, without duplicates.
    pub fn capture(supervisor_id: Option<i64>, managers: &[i64]) -> Self {
        let mut ids: Vec<i64> = Vec::with_capacity(managers.len() + 1);
        for id in supervisor_id.iter().chain(managers.iter()) {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }
        Self(ids)
    }

    pub fn from_stored(ids: Vec<i64>) -> Self {
        Self(ids)
    }

    pub fn ids(&self) -> &[i64] {
        &self.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SosAlert {
    pub id: i64,
    pub org_id: i64,
    pub user_id: i64,
    pub zone_id: Option<i64>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub message: Option<String>,
    pub status: SosStatus,
    pub notified_user_ids: NotifiedSnapshot,
    pub acknowledged_by: Option<i64>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<i64>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}
