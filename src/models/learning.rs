use super::broadcast::default_target_roles;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialType {
    Video,
    Pdf,
    Slides,
    Document,
    Link,
}

impl MaterialType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            MaterialType::Video => "video",
            MaterialType::Pdf => "pdf",
            MaterialType::Slides => "slides",
            MaterialType::Document => "document",
            MaterialType::Link => "link",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "video" => Some(MaterialType::Video),
            "pdf" => Some(MaterialType::Pdf),
            "slides" => Some(MaterialType::Slides),
            "document" => Some(MaterialType::Document),
            "link" => Some(MaterialType::Link),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LearningMaterial {
    pub id: i64,
    pub org_id: i64,
    pub created_by: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: MaterialType,
    pub file_url: String,
    pub thumbnail_url: Option<String>,
    pub duration_min: Option<i64>,
    pub page_count: Option<i64>,
    pub target_roles: Vec<String>,
    pub is_mandatory: bool,
    pub is_active: bool,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LearningProgress {
    pub id: i64,
    pub material_id: i64,
    pub user_id: i64,
    pub org_id: i64,
    pub progress_pct: i64,
    pub is_completed: bool,
    pub last_accessed: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaterialView {
    #[serde(flatten)]
    pub material: LearningMaterial,
    pub my_progress: Option<LearningProgress>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMaterial {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: MaterialType,
    pub file_url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub duration_min: Option<i64>,
    #[serde(default)]
    pub page_count: Option<i64>,
    #[serde(default = "default_target_roles")]
    pub target_roles: Vec<String>,
    #[serde(default)]
    pub is_mandatory: bool,
}
