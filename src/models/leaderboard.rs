use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    Daily,
    Weekly,
    Monthly,
}

impl PeriodKind {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PeriodKind::Daily => "daily",
            PeriodKind::Weekly => "weekly",
            PeriodKind::Monthly => "monthly",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "daily" => Some(PeriodKind::Daily),
            "weekly" => Some(PeriodKind::Weekly),
            "monthly" => Some(PeriodKind::Monthly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardScore {
    pub id: i64,
    pub user_id: i64,
    pub org_id: i64,
    pub zone_id: Option<i64>,
    pub period: PeriodKind,
    pub period_start: NaiveDate,
    pub overall_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    #[serde(flatten)]
    pub score: LeaderboardScore,
    pub user_name: String,
    pub employee_id: Option<String>,
    pub rank: usize,
    pub is_me: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Leaderboard {
    pub period: PeriodKind,
    pub period_start: NaiveDate,
    pub entries: Vec<LeaderboardEntry>,
}
