use super::{date_to_db, get_date, get_enum};
use crate::errors::AppResult;
use crate::models::leaderboard::{LeaderboardScore, PeriodKind};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_score(row: &Row) -> rusqlite::Result<LeaderboardScore> {
    Ok(LeaderboardScore {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        org_id: row.get("org_id")?,
        zone_id: row.get("zone_id")?,
        period: get_enum(row, "period", PeriodKind::from_db_str)?,
        period_start: get_date(row, "period_start")?,
        overall_score: row.get("overall_score")?,
    })
}

/// Write (or overwrite) a user's score for one period.
pub fn upsert_score(
    conn: &Connection,
    user_id: i64,
    org_id: i64,
    zone_id: Option<i64>,
    period: PeriodKind,
    period_start: &NaiveDate,
    score: f64,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO leaderboard_scores (user_id, org_id, zone_id, period, period_start, overall_score)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(user_id, period, period_start)
         DO UPDATE SET overall_score = excluded.overall_score, zone_id = excluded.zone_id",
        params![
            user_id,
            org_id,
            zone_id,
            period.to_db_str(),
            date_to_db(period_start),
            score
        ],
    )?;
    Ok(())
}

/// Highest scores first, each with the user's name and employee id.
pub fn top_scores(
    conn: &Connection,
    org_id: i64,
    period: PeriodKind,
    period_start: &NaiveDate,
    zone_id: Option<i64>,
    limit: u32,
) -> AppResult<Vec<(LeaderboardScore, String, Option<String>)>> {
    let mut stmt = conn.prepare(
        "SELECT s.*, u.name AS user_name, u.employee_id AS employee_id
         FROM leaderboard_scores s
         JOIN users u ON u.id = s.user_id
         WHERE s.org_id = ?1 AND s.period = ?2 AND s.period_start = ?3
           AND (?4 IS NULL OR s.zone_id = ?4)
         ORDER BY s.overall_score DESC, s.user_id ASC
         LIMIT ?5",
    )?;
    let rows = stmt.query_map(
        params![
            org_id,
            period.to_db_str(),
            date_to_db(period_start),
            zone_id,
            limit
        ],
        |row| Ok((map_score(row)?, row.get("user_name")?, row.get("employee_id")?)),
    )?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_score(
    conn: &Connection,
    user_id: i64,
    period: PeriodKind,
    period_start: &NaiveDate,
) -> AppResult<Option<LeaderboardScore>> {
    let score = conn
        .query_row(
            "SELECT * FROM leaderboard_scores WHERE user_id = ?1 AND period = ?2 AND period_start = ?3",
            params![user_id, period.to_db_str(), date_to_db(period_start)],
            map_score,
        )
        .optional()?;
    Ok(score)
}
