use crate::core::calculator::period::PERIOD_RULE_VERSION;
use crate::db::migrate::{latest_version, schema_version};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW, flag};
use rusqlite::OptionalExtension;
use std::fs;

/// Tables reported by `db --info`, in display order.
const COUNTED_TABLES: [(&str, &str); 11] = [
    ("organisations", "Organisations"),
    ("users", "Users"),
    ("zones", "Zones"),
    ("attendance", "Attendance records"),
    ("stock_allocations", "Stock allocations"),
    ("sos_alerts", "SOS alerts"),
    ("grievances", "Grievances"),
    ("broadcast_questions", "Broadcast questions"),
    ("learning_materials", "Learning materials"),
    ("form_submissions", "Form submissions"),
    ("visit_logs", "Visit logs"),
];

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    println!();

    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);
    let version = schema_version(&pool.conn)?;
    println!(
        "{}• Schema:{} v{} (latest v{}, current: {})",
        CYAN,
        RESET,
        version,
        latest_version(),
        flag(version == latest_version())
    );
    println!("{}• Period rule:{} v{}", CYAN, RESET, PERIOD_RULE_VERSION);

    for (table, label) in COUNTED_TABLES {
        let count: i64 =
            pool.conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?;
        println!("{}• {}:{} {}{}{}", CYAN, label, RESET, GREEN, count, RESET);
    }

    let first_date: Option<String> = pool
        .conn
        .query_row("SELECT MIN(date) FROM attendance", [], |row| {
            row.get::<_, Option<String>>(0)
        })
        .optional()?
        .flatten();
    let last_date: Option<String> = pool
        .conn
        .query_row("SELECT MAX(date) FROM attendance", [], |row| {
            row.get::<_, Option<String>>(0)
        })
        .optional()?
        .flatten();

    let fmt = |d: Option<String>| d.unwrap_or_else(|| format!("{GREY}--{RESET}"));
    println!("{}• Attendance range:{}", CYAN, RESET);
    println!("    from: {}", fmt(first_date));
    println!("    to:   {}", fmt(last_date));

    println!();
    Ok(())
}
