use crate::models::leaderboard::PeriodKind;
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};

/// Version of the period-start rule. Scores are written and looked up with the
/// same key, so changing [`period_start`] must bump this.
pub const PERIOD_RULE_VERSION: u32 = 1;

/// Canonical period start (UTC calendar) for a reference instant.
pub fn period_start(at: DateTime<Utc>, kind: PeriodKind) -> NaiveDate {
    period_start_for_date(at.date_naive(), kind)
}

pub fn period_start_for_date(date: NaiveDate, kind: PeriodKind) -> NaiveDate {
    match kind {
        PeriodKind::Daily => date,
        PeriodKind::Weekly => {
            let back = u64::from(date.weekday().num_days_from_monday());
            date.checked_sub_days(Days::new(back)).unwrap_or(date)
        }
        PeriodKind::Monthly => date.with_day(1).unwrap_or(date),
    }
}
