use crate::core::auth::Session;
use crate::core::calculator::period::period_start;
use crate::db::leaderboard as store;
use crate::errors::{AppError, AppResult};
use crate::models::leaderboard::{Leaderboard, LeaderboardEntry, LeaderboardScore, PeriodKind};

/// Parse a period name; anything but daily/weekly/monthly is rejected.
pub fn parse_period(s: &str) -> AppResult<PeriodKind> {
    PeriodKind::from_db_str(s).ok_or_else(|| {
        AppError::validation(format!(
            "Invalid period '{}'. Use daily, weekly or monthly.",
            s
        ))
    })
}

pub struct LeaderboardLogic;

impl LeaderboardLogic {
    /// Ranked scores for the current period of `kind`. `limit` must already be
    /// clamped by the caller.
    pub fn show(
        s: &Session,
        kind: PeriodKind,
        limit: u32,
        zone_id: Option<i64>,
    ) -> AppResult<Leaderboard> {
        let start = period_start(s.now, kind);
        let rows = store::top_scores(&s.pool.conn, s.caller.org_id, kind, &start, zone_id, limit)?;

        let entries = rows
            .into_iter()
            .enumerate()
            .map(|(idx, (score, user_name, employee_id))| LeaderboardEntry {
                is_me: score.user_id == s.caller.id,
                rank: idx + 1,
                score,
                user_name,
                employee_id,
            })
            .collect();

        Ok(Leaderboard {
            period: kind,
            period_start: start,
            entries,
        })
    }

    pub fn me(s: &Session, kind: PeriodKind) -> AppResult<Option<LeaderboardScore>> {
        store::find_score(&s.pool.conn, s.caller.id, kind, &period_start(s.now, kind))
    }
}

/// Clamp a requested page length to `[1, max]`.
pub fn clamp_limit(requested: Option<u32>, default: u32, max: u32) -> u32 {
    requested.unwrap_or(default).clamp(1, max.max(1))
}
