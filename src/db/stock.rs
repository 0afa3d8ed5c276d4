use super::{date_to_db, get_date, get_enum, get_opt_ts, get_ts, ts_to_db};
use crate::errors::AppResult;
use crate::models::stock::{ItemReview, ItemStatus, NewStockItem, StockAllocation, StockItem};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_item(row: &Row) -> rusqlite::Result<StockItem> {
    Ok(StockItem {
        id: row.get("id")?,
        allocation_id: row.get("allocation_id")?,
        product_name: row.get("product_name")?,
        sku: row.get("sku")?,
        category: row.get("category")?,
        quantity_allocated: row.get("quantity_allocated")?,
        quantity_accepted: row.get("quantity_accepted")?,
        unit: row.get("unit")?,
        status: get_enum(row, "status", ItemStatus::from_db_str)?,
        rejection_reason: row.get("rejection_reason")?,
    })
}

fn map_allocation(row: &Row) -> rusqlite::Result<StockAllocation> {
    Ok(StockAllocation {
        id: row.get("id")?,
        org_id: row.get("org_id")?,
        user_id: row.get("user_id")?,
        zone_id: row.get("zone_id")?,
        activity_id: row.get("activity_id")?,
        date: get_date(row, "date")?,
        notes: row.get("notes")?,
        status: get_enum(row, "status", ItemStatus::from_db_str)?,
        created_by: row.get("created_by")?,
        created_at: get_ts(row, "created_at")?,
        reviewed_at: get_opt_ts(row, "reviewed_at")?,
        items: Vec::new(),
        user_name: None,
        supervisor_id: None,
    })
}

pub struct NewAllocation<'a> {
    pub org_id: i64,
    pub user_id: i64,
    pub zone_id: Option<i64>,
    pub activity_id: Option<&'a str>,
    pub date: NaiveDate,
    pub notes: Option<&'a str>,
    pub created_by: i64,
}

pub fn insert_allocation(
    conn: &Connection,
    a: &NewAllocation,
    now: DateTime<Utc>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO stock_allocations (org_id, user_id, zone_id, activity_id, date, notes, status, created_by, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            a.org_id,
            a.user_id,
            a.zone_id,
            a.activity_id,
            date_to_db(&a.date),
            a.notes,
            ItemStatus::Pending.to_db_str(),
            a.created_by,
            ts_to_db(&now),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_item(conn: &Connection, allocation_id: i64, item: &NewStockItem) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO stock_items (allocation_id, product_name, sku, category, quantity_allocated, unit, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            allocation_id,
            item.product_name,
            item.sku,
            item.category,
            item.quantity_allocated,
            item.unit,
            ItemStatus::Pending.to_db_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn items_for(conn: &Connection, allocation_id: i64) -> AppResult<Vec<StockItem>> {
    let mut stmt =
        conn.prepare_cached("SELECT * FROM stock_items WHERE allocation_id = ?1 ORDER BY id ASC")?;
    let rows = stmt.query_map([allocation_id], map_item)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_allocation(conn: &Connection, id: i64) -> AppResult<Option<StockAllocation>> {
    let alloc = conn
        .query_row(
            "SELECT * FROM stock_allocations WHERE id = ?1",
            [id],
            map_allocation,
        )
        .optional()?;
    match alloc {
        Some(mut a) => {
            a.items = items_for(conn, a.id)?;
            Ok(Some(a))
        }
        None => Ok(None),
    }
}

pub fn find_for_day(
    conn: &Connection,
    user_id: i64,
    date: &NaiveDate,
) -> AppResult<Option<StockAllocation>> {
    let id: Option<i64> = conn
        .query_row(
            "SELECT id FROM stock_allocations WHERE user_id = ?1 AND date = ?2",
            params![user_id, date_to_db(date)],
            |row| row.get(0),
        )
        .optional()?;
    match id {
        Some(id) => find_allocation(conn, id),
        None => Ok(None),
    }
}

/// An item together with its allocation's owner and organisation.
pub struct ItemOwnership {
    pub item: StockItem,
    pub owner_id: i64,
    pub org_id: i64,
}

pub fn find_item(conn: &Connection, item_id: i64) -> AppResult<Option<ItemOwnership>> {
    let found = conn
        .query_row(
            "SELECT i.*, a.user_id AS owner_id, a.org_id AS owner_org
             FROM stock_items i
             JOIN stock_allocations a ON a.id = i.allocation_id
             WHERE i.id = ?1",
            [item_id],
            |row| {
                Ok(ItemOwnership {
                    item: map_item(row)?,
                    owner_id: row.get("owner_id")?,
                    org_id: row.get("owner_org")?,
                })
            },
        )
        .optional()?;
    Ok(found)
}

pub fn apply_review(conn: &Connection, item_id: i64, review: &ItemReview) -> AppResult<()> {
    conn.execute(
        "UPDATE stock_items
         SET status = ?1,
             quantity_accepted = COALESCE(?2, quantity_accepted),
             rejection_reason = COALESCE(?3, rejection_reason)
         WHERE id = ?4",
        params![
            review.status.to_db_str(),
            review.quantity_accepted,
            review.rejection_reason,
            item_id,
        ],
    )?;
    Ok(())
}

pub fn item_statuses(conn: &Connection, allocation_id: i64) -> AppResult<Vec<ItemStatus>> {
    Ok(items_for(conn, allocation_id)?
        .into_iter()
        .map(|i| i.status)
        .collect())
}

pub fn set_allocation_status(
    conn: &Connection,
    allocation_id: i64,
    status: ItemStatus,
    reviewed_at: DateTime<Utc>,
) -> AppResult<()> {
    conn.execute(
        "UPDATE stock_allocations SET status = ?1, reviewed_at = ?2 WHERE id = ?3",
        params![status.to_db_str(), ts_to_db(&reviewed_at), allocation_id],
    )?;
    Ok(())
}

pub fn team_for_day(
    conn: &Connection,
    org_id: i64,
    date: &NaiveDate,
) -> AppResult<Vec<StockAllocation>> {
    let mut stmt = conn.prepare(
        "SELECT a.*, u.name AS user_name, u.supervisor_id AS supervisor_id
         FROM stock_allocations a
         JOIN users u ON u.id = a.user_id
         WHERE a.org_id = ?1 AND a.date = ?2
         ORDER BY a.created_at DESC, a.id DESC",
    )?;
    let rows = stmt.query_map(params![org_id, date_to_db(date)], |row| {
        let mut a = map_allocation(row)?;
        a.user_name = row.get("user_name")?;
        a.supervisor_id = row.get("supervisor_id")?;
        Ok(a)
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    for a in &mut out {
        a.items = items_for(conn, a.id)?;
    }
    Ok(out)
}
