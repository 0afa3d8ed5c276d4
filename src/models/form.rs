use super::broadcast::QuizOption;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Select,
    MultiSelect,
    Radio,
    Checkbox,
    Photo,
    Date,
    Rating,
}

impl FieldType {
    pub const ALL: [FieldType; 10] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Number,
        FieldType::Select,
        FieldType::MultiSelect,
        FieldType::Radio,
        FieldType::Checkbox,
        FieldType::Photo,
        FieldType::Date,
        FieldType::Rating,
    ];

    pub fn to_db_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Select => "select",
            FieldType::MultiSelect => "multi_select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Photo => "photo",
            FieldType::Date => "date",
            FieldType::Rating => "rating",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.to_db_str() == s)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub id: i64,
    pub template_id: i64,
    pub label: String,
    pub field_key: String,
    pub field_type: FieldType,
    pub placeholder: Option<String>,
    pub help_text: Option<String>,
    pub is_required: bool,
    pub sort_order: i64,
    pub options: Vec<QuizOption>,
    pub validation: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormTemplate {
    pub id: i64,
    pub org_id: i64,
    pub activity_id: String,
    pub name: String,
    pub description: Option<String>,
    pub requires_photo: bool,
    pub requires_gps: bool,
    pub is_active: bool,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewField {
    pub label: String,
    pub field_key: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub help_text: Option<String>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub options: Vec<QuizOption>,
    #[serde(default = "empty_object")]
    pub validation: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTemplate {
    pub activity_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requires_photo: bool,
    #[serde(default = "default_true")]
    pub requires_gps: bool,
    #[serde(default)]
    pub fields: Vec<NewField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormResponse {
    #[serde(default, skip_deserializing)]
    pub id: i64,
    pub field_id: i64,
    pub field_key: String,
    #[serde(default)]
    pub value_text: Option<String>,
    #[serde(default)]
    pub value_number: Option<f64>,
    #[serde(default)]
    pub value_bool: Option<bool>,
    #[serde(default)]
    pub value_json: Option<Value>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSubmission {
    pub template_id: i64,
    #[serde(default)]
    pub activity_id: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub is_converted: bool,
    #[serde(default)]
    pub outlet_name: Option<String>,
    #[serde(default)]
    pub consumer_age: Option<String>,
    #[serde(default)]
    pub consumer_gender: Option<String>,
    pub responses: Vec<FormResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormSubmission {
    pub id: i64,
    pub org_id: i64,
    pub user_id: i64,
    pub template_id: i64,
    pub template_name: Option<String>,
    pub activity_id: Option<String>,
    pub attendance_id: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub is_converted: bool,
    pub outlet_name: Option<String>,
    pub consumer_age: Option<String>,
    pub consumer_gender: Option<String>,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<Vec<FormResponse>>,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

fn default_true() -> bool {
    true
}
