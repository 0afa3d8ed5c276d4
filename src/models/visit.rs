use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Supervisor's assessment of an executive during a field visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitRating {
    Excellent,
    #[default]
    Good,
    Average,
    Poor,
}

impl VisitRating {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            VisitRating::Excellent => "excellent",
            VisitRating::Good => "good",
            VisitRating::Average => "average",
            VisitRating::Poor => "poor",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "excellent" => Some(VisitRating::Excellent),
            "good" => Some(VisitRating::Good),
            "average" => Some(VisitRating::Average),
            "poor" => Some(VisitRating::Poor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VisitLog {
    pub id: i64,
    pub org_id: i64,
    pub executive_id: i64,
    pub visitor_id: i64,
    pub zone_id: Option<i64>,
    pub date: NaiveDate,
    pub visited_at: DateTime<Utc>,
    pub rating: VisitRating,
    pub remarks: Option<String>,
    pub photo_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executive_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_name: Option<String>,
}
