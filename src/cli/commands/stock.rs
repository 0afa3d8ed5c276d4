use super::{Context, read_body};
use crate::cli::parser::StockCmd;
use crate::core::stock::{AllocateRequest, StockLogic};
use crate::errors::{AppError, AppResult};
use crate::models::stock::{ItemReview, ItemStatus, NewStockItem};
use crate::ui::envelope;
use crate::utils::date::{date_or, parse_date, today};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ItemBody {
    product_name: String,
    #[serde(default)]
    sku: Option<String>,
    #[serde(default)]
    category: Option<String>,
    quantity_allocated: i64,
    #[serde(default)]
    unit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AllocateBody {
    user_id: i64,
    date: String,
    #[serde(default)]
    zone_id: Option<i64>,
    #[serde(default)]
    activity_id: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    items: Vec<ItemBody>,
}

impl AllocateBody {
    fn into_request(self) -> AppResult<AllocateRequest> {
        let date = parse_date(&self.date).ok_or_else(|| {
            AppError::validation(format!("Invalid date '{}'. Expected YYYY-MM-DD.", self.date))
        })?;
        let items = self
            .items
            .into_iter()
            .map(|i| NewStockItem {
                product_name: i.product_name,
                sku: i.sku,
                category: i.category,
                quantity_allocated: i.quantity_allocated,
                unit: i.unit.unwrap_or_else(|| "units".to_string()),
            })
            .collect();
        Ok(AllocateRequest {
            user_id: self.user_id,
            date,
            zone_id: self.zone_id,
            activity_id: self.activity_id,
            notes: self.notes,
            items,
        })
    }
}

pub fn handle(action: &StockCmd, ctx: &Context) -> AppResult<()> {
    match action {
        StockCmd::Allocate { body } => {
            let req = read_body::<AllocateBody>(body)?.into_request()?;
            let mut s = ctx.session()?;
            let allocation = StockLogic::allocate(&mut s, &req)?;
            envelope::created(&allocation, "Stock allocated")
        }

        StockCmd::Review {
            item,
            status,
            quantity_accepted,
            reason,
        } => {
            let status = ItemStatus::from_review_str(status).ok_or_else(|| {
                AppError::validation("status must be one of: accepted, rejected, partially_accepted")
            })?;
            let review = ItemReview {
                status,
                quantity_accepted: *quantity_accepted,
                rejection_reason: reason.clone(),
            };
            let mut s = ctx.session()?;
            let outcome = StockLogic::review_item(&mut s, *item, &review)?;
            envelope::ok_with(&outcome, "Item reviewed")
        }

        StockCmd::My { date } => {
            let s = ctx.session()?;
            let date = date_or(date.as_deref(), today(s.now))?;
            envelope::ok(&StockLogic::mine(&s, date)?)
        }

        StockCmd::Team { date } => {
            let s = ctx.session()?;
            let date = date_or(date.as_deref(), today(s.now))?;
            envelope::ok(&StockLogic::team(&s, date)?)
        }
    }
}
