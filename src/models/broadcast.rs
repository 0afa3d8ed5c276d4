use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    Active,
    Closed,
}

impl QuestionStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            QuestionStatus::Active => "active",
            QuestionStatus::Closed => "closed",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(QuestionStatus::Active),
            "closed" => Some(QuestionStatus::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOption {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BroadcastQuestion {
    pub id: i64,
    pub org_id: i64,
    pub created_by: i64,
    pub question: String,
    pub options: Vec<QuizOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_option: Option<i64>,
    pub is_urgent: bool,
    pub deadline_at: Option<DateTime<Utc>>,
    pub target_roles: Vec<String>,
    pub target_zone_ids: Vec<i64>,
    pub status: QuestionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BroadcastAnswer {
    pub id: i64,
    pub question_id: i64,
    pub user_id: i64,
    pub org_id: i64,
    pub selected: i64,
    pub is_correct: Option<bool>,
    pub answered_at: DateTime<Utc>,
}

/// A question as listed to one caller.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    #[serde(flatten)]
    pub question: BroadcastQuestion,
    pub already_answered: bool,
    pub my_answer: Option<BroadcastAnswer>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionTally {
    #[serde(flatten)]
    pub option: QuizOption,
    pub index: usize,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionResults {
    #[serde(flatten)]
    pub question: BroadcastQuestion,
    pub answers: Vec<BroadcastAnswer>,
    pub tally: Vec<OptionTally>,
    pub total_answers: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerReceipt {
    #[serde(flatten)]
    pub answer: BroadcastAnswer,
    pub correct_option: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewQuestion {
    pub question: String,
    pub options: Vec<QuizOption>,
    #[serde(default)]
    pub correct_option: Option<i64>,
    #[serde(default)]
    pub is_urgent: bool,
    #[serde(default)]
    pub deadline_at: Option<DateTime<Utc>>,
    #[serde(default = "default_target_roles")]
    pub target_roles: Vec<String>,
    #[serde(default)]
    pub target_zone_ids: Vec<i64>,
}

pub fn default_target_roles() -> Vec<String> {
    vec!["executive".to_string()]
}
