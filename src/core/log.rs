use crate::db::log::load;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use ansi_term::Colour;
use regex::Regex;

const MAX_OP_WIDTH: usize = 60;

/// ANSI colour for an operation name.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "sos_triggered" | "sos_update" => Colour::Red,
        "checkin" | "checkout" => Colour::Green,
        "break_start" | "break_end" => Colour::Yellow,
        "visit_log" => Colour::Green,
        "init" => Colour::RGB(255, 153, 51),
        other if other.starts_with("migrat") => Colour::Purple,
        other if other.starts_with("provision_") => Colour::Blue,
        other if other.starts_with("user_") || other.starts_with("zone_") => Colour::Blue,
        other if other.starts_with("stock_") => Colour::Cyan,
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let ansi = Regex::new(r"\x1B\[[0-9;]*[mK]").map_err(|e| AppError::Other(e.to_string()))?;
        let entries = load(&pool.conn)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let rows: Vec<(i64, String, String, String)> = entries
            .into_iter()
            .map(|(id, raw_date, operation, target, message)| {
                let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or(raw_date);
                let op_target = if target.is_empty() {
                    operation
                } else {
                    format!("{operation} ({target})")
                };
                (id, date, op_target, message)
            })
            .collect();

        let op_w = rows
            .iter()
            .map(|(_, _, op, _)| op.chars().count())
            .max()
            .unwrap_or(10)
            .min(MAX_OP_WIDTH);
        let id_w = rows.iter().map(|(id, ..)| id.to_string().len()).max().unwrap_or(1);
        let date_w = rows.iter().map(|(_, d, ..)| d.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for (id, date, op_target, message) in rows {
            let visible: String = if op_target.chars().count() > MAX_OP_WIDTH {
                let mut s: String = op_target.chars().take(MAX_OP_WIDTH - 3).collect();
                s.push_str("...");
                s
            } else {
                op_target
            };

            // Only the operation word is coloured.
            let painted = match visible.split_once(' ') {
                Some((op, rest)) => format!("{} {}", color_for_operation(op).paint(op), rest),
                None => color_for_operation(&visible).paint(visible.as_str()).to_string(),
            };
            let width = ansi.replace_all(&painted, "").chars().count();
            let padding = " ".repeat(op_w.saturating_sub(width));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id,
                date,
                painted,
                padding,
                message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
