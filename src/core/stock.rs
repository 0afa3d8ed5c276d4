use crate::core::auth::Session;
use crate::core::calculator::allocation::aggregate;
use crate::core::visibility::scope_to_team;
use crate::db::log::audit;
use crate::db::stock::{self as store, NewAllocation};
use crate::db::{is_unique_violation, users};
use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use crate::models::stock::{ItemReview, NewStockItem, StockAllocation, StockItem};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone)]
pub struct AllocateRequest {
    pub user_id: i64,
    pub date: NaiveDate,
    pub zone_id: Option<i64>,
    pub activity_id: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<NewStockItem>,
}

/// Result of an item review: the item and its allocation's new status.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewOutcome {
    #[serde(flatten)]
    pub item: StockItem,
    pub allocation_status: crate::models::stock::ItemStatus,
}

pub struct StockLogic;

impl StockLogic {
    pub fn allocate(s: &mut Session, req: &AllocateRequest) -> AppResult<StockAllocation> {
        s.require(Role::CityManager)?;
        validate_items(&req.items)?;

        let org_id = s.caller.org_id;
        let created_by = s.caller.id;
        let now = s.now;

        let id = s.pool.with_tx(|tx| {
            let owner = users::find_user_in_org(tx, req.user_id, org_id)?
                .ok_or_else(|| AppError::NotFound("User not found".into()))?;

            let row = NewAllocation {
                org_id,
                user_id: owner.id,
                zone_id: req.zone_id.or(owner.zone_id),
                activity_id: req.activity_id.as_deref(),
                date: req.date,
                notes: req.notes.as_deref(),
                created_by,
            };
            let id = match store::insert_allocation(tx, &row, now) {
                Ok(id) => id,
                Err(e) if is_unique_violation(&e) => {
                    return Err(AppError::Conflict(
                        "Stock already allocated to this user for this date".into(),
                    ));
                }
                Err(e) => return Err(e),
            };
            for item in &req.items {
                store::insert_item(tx, id, item)?;
            }
            Ok(id)
        })?;

        let conn = &s.pool.conn;
        audit(
            conn,
            "stock_allocate",
            &format!("allocation {}", id),
            &format!(
                "{} item(s) for user {} on {}",
                req.items.len(),
                req.user_id,
                req.date
            ),
        );
        store::find_allocation(conn, id)?
            .ok_or_else(|| AppError::Other(format!("allocation {} vanished after insert", id)))
    }

    /// Review one item and recompute the allocation status in the same
    /// transaction.
    pub fn review_item(s: &mut Session, item_id: i64, review: &ItemReview) -> AppResult<ReviewOutcome> {
        let caller = s.caller.clone();
        let now = s.now;

        let outcome = s.pool.with_tx(|tx| {
            let found = store::find_item(tx, item_id)?
                .filter(|f| f.org_id == caller.org_id)
                .ok_or_else(|| AppError::NotFound("Stock item not found".into()))?;

            if found.owner_id != caller.id && !caller.role.is_administrative() {
                return Err(AppError::Forbidden(
                    "Only the allocated user or an administrator can review this item".into(),
                ));
            }

            if let Some(q) = review.quantity_accepted
                && !(0..=found.item.quantity_allocated).contains(&q)
            {
                return Err(AppError::validation_with(
                    "Validation failed",
                    json!([{
                        "field": "quantity_accepted",
                        "message": format!("must be between 0 and {}", found.item.quantity_allocated),
                    }]),
                ));
            }

            store::apply_review(tx, item_id, review)?;
            let allocation_id = found.item.allocation_id;
            let status = aggregate(store::item_statuses(tx, allocation_id)?);
            store::set_allocation_status(tx, allocation_id, status, now)?;

            let item = store::items_for(tx, allocation_id)?
                .into_iter()
                .find(|i| i.id == item_id)
                .ok_or_else(|| AppError::NotFound("Stock item not found".into()))?;
            Ok(ReviewOutcome {
                item,
                allocation_status: status,
            })
        })?;

        audit(
            &s.pool.conn,
            "stock_review",
            &format!("item {}", item_id),
            &format!(
                "Item {} → allocation {}",
                review.status.to_db_str(),
                outcome.allocation_status.to_db_str()
            ),
        );
        Ok(outcome)
    }

    /// The caller's allocation for `date`, with items.
    pub fn mine(s: &Session, date: NaiveDate) -> AppResult<Option<StockAllocation>> {
        store::find_for_day(&s.pool.conn, s.caller.id, &date)
    }

    pub fn team(s: &Session, date: NaiveDate) -> AppResult<Vec<StockAllocation>> {
        s.require(Role::Supervisor)?;
        let rows = store::team_for_day(&s.pool.conn, s.caller.org_id, &date)?;
        Ok(scope_to_team(&s.caller, rows, |a| a.supervisor_id))
    }
}

fn validate_items(items: &[NewStockItem]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::validation_with(
            "Validation failed",
            json!([{ "field": "items", "message": "at least one item is required" }]),
        ));
    }
    let mut errors = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        if item.product_name.trim().is_empty() {
            errors.push(json!({ "field": format!("items[{}].product_name", idx), "message": "is required" }));
        }
        if item.quantity_allocated <= 0 {
            errors.push(json!({ "field": format!("items[{}].quantity_allocated", idx), "message": "must be positive" }));
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation_with("Validation failed", json!(errors)))
    }
}
