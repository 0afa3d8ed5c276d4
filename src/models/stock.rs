use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Status shared by stock items and (derived) allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    Accepted,
    Rejected,
    PartiallyAccepted,
}

impl ItemStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Accepted => "accepted",
            ItemStatus::Rejected => "rejected",
            ItemStatus::PartiallyAccepted => "partially_accepted",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ItemStatus::Pending),
            "accepted" => Some(ItemStatus::Accepted),
            "rejected" => Some(ItemStatus::Rejected),
            "partially_accepted" => Some(ItemStatus::PartiallyAccepted),
            _ => None,
        }
    }

    /// Statuses a reviewer may assign to an item.
    pub fn from_review_str(s: &str) -> Option<Self> {
        match Self::from_db_str(&s.to_lowercase()) {
            Some(ItemStatus::Pending) | None => None,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StockItem {
    pub id: i64,
    pub allocation_id: i64,
    pub product_name: String,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub quantity_allocated: i64,
    pub quantity_accepted: i64,
    pub unit: String,
    pub status: ItemStatus,
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StockAllocation {
    pub id: i64,
    pub org_id: i64,
    pub user_id: i64,
    pub zone_id: Option<i64>,
    pub activity_id: Option<String>,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub status: ItemStatus,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub items: Vec<StockItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip)]
    pub supervisor_id: Option<i64>,
}

/// Item line of a new allocation.
#[derive(Debug, Clone)]
pub struct NewStockItem {
    pub product_name: String,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub quantity_allocated: i64,
    pub unit: String,
}

/// Reviewer decision for one item.
#[derive(Debug, Clone)]
pub struct ItemReview {
    pub status: ItemStatus,
    pub quantity_accepted: Option<i64>,
    pub rejection_reason: Option<String>,
}
