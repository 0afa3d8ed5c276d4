use chrono::{DateTime, NaiveDate, Utc};
use kinematic::core::calculator::allocation::aggregate;
use kinematic::core::calculator::attendance::{AttendanceDay, round_minutes, working_minutes};
use kinematic::core::calculator::geofence::{Coordinates, evaluate, haversine_distance};
use kinematic::core::calculator::period::{period_start, period_start_for_date};
use kinematic::errors::AppError;
use kinematic::models::attendance::AttendanceStatus;
use kinematic::models::leaderboard::PeriodKind;
use kinematic::models::stock::ItemStatus;

fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid instant")
        .with_timezone(&Utc)
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

fn pt(lat: f64, lng: f64) -> Coordinates {
    Coordinates::new(lat, lng).expect("valid coordinates")
}

// ---------------------------------------------------------------- geofence

#[test]
fn test_haversine_one_degree_on_equator() {
    let d = haversine_distance(pt(0.0, 0.0), pt(0.0, 1.0));
    assert_eq!(d.round() as i64, 111_195);
}

#[test]
fn test_haversine_symmetric_and_zero() {
    let a = pt(19.0760, 72.8777);
    let b = pt(19.0790, 72.8777);
    assert_eq!(haversine_distance(a, b), haversine_distance(b, a));
    assert_eq!(haversine_distance(a, a), 0.0);
}

#[test]
fn test_fence_boundary_is_inclusive() {
    let center = pt(19.0760, 72.8777);
    let point = pt(19.0764, 72.8777);
    let exact = haversine_distance(point, center);

    let inside = evaluate(point, center, exact.ceil() as i64);
    assert!(inside.within_fence);
    assert_eq!(inside.distance_m, exact.round() as i64);

    let outside = evaluate(point, center, exact.floor() as i64);
    assert!(!outside.within_fence);

    // zero radius admits only the centre itself
    assert!(evaluate(center, center, 0).within_fence);
    assert!(!evaluate(point, center, 0).within_fence);
}

#[test]
fn test_coordinates_out_of_range() {
    match Coordinates::new(91.0, 0.0) {
        Err(AppError::Validation { details, .. }) => {
            let details = details.expect("details");
            assert_eq!(details[0]["field"], "latitude");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(Coordinates::new(0.0, -180.5).is_err());
    assert!(Coordinates::new(-90.0, 180.0).is_ok());
}

// -------------------------------------------------------------- allocation

#[test]
fn test_aggregate_status() {
    use ItemStatus::*;
    assert_eq!(aggregate([Accepted, Accepted]), Accepted);
    assert_eq!(aggregate([Rejected, Rejected]), Rejected);
    assert_eq!(aggregate([Accepted, Rejected]), PartiallyAccepted);
    assert_eq!(aggregate([Pending, Accepted]), PartiallyAccepted);
    assert_eq!(aggregate([Pending, Rejected, Pending]), PartiallyAccepted);
    assert_eq!(aggregate([PartiallyAccepted]), PartiallyAccepted);
    assert_eq!(aggregate([Pending, Pending]), Pending);
}

// ------------------------------------------------------------------ period

#[test]
fn test_weekly_period_starts_on_monday() {
    // Wednesday
    assert_eq!(
        period_start(at("2025-03-12T09:00:00Z"), PeriodKind::Weekly),
        date("2025-03-10")
    );
    // Sunday late evening
    assert_eq!(
        period_start(at("2025-03-16T23:59:59Z"), PeriodKind::Weekly),
        date("2025-03-10")
    );
    // Monday itself
    assert_eq!(
        period_start_for_date(date("2025-03-10"), PeriodKind::Weekly),
        date("2025-03-10")
    );
    // across a month boundary
    assert_eq!(
        period_start_for_date(date("2025-03-02"), PeriodKind::Weekly),
        date("2025-02-24")
    );
}

#[test]
fn test_daily_and_monthly_periods() {
    let when = at("2025-03-31T18:30:00Z");
    assert_eq!(period_start(when, PeriodKind::Daily), date("2025-03-31"));
    assert_eq!(period_start(when, PeriodKind::Monthly), date("2025-03-01"));
}

// -------------------------------------------------------------- attendance

#[test]
fn test_minute_rounding() {
    let start = at("2025-03-12T09:00:00Z");
    assert_eq!(round_minutes(start, at("2025-03-12T09:01:30Z")), 2);
    assert_eq!(round_minutes(start, at("2025-03-12T09:00:29Z")), 0);
    assert_eq!(round_minutes(start, at("2025-03-12T08:00:00Z")), 0);
    assert_eq!(working_minutes(start, at("2025-03-12T09:10:00Z"), 30), 0);
}

#[test]
fn test_full_day_machine() {
    let mut day = AttendanceDay::none();
    day.check_in(at("2025-03-12T09:00:00Z")).expect("check in");
    assert_eq!(day.status, Some(AttendanceStatus::CheckedIn));

    day.start_break(at("2025-03-12T13:00:00Z")).expect("break");
    assert_eq!(day.status, Some(AttendanceStatus::OnBreak));
    assert_eq!(day.end_break(at("2025-03-12T13:15:00Z")).expect("end"), 15);

    let summary = day.check_out(at("2025-03-12T17:00:00Z")).expect("check out");
    assert_eq!(summary.total_minutes, 480);
    assert_eq!(summary.break_minutes, 15);
    assert_eq!(summary.working_minutes, 465);
    assert_eq!(summary.closed_break_minutes, None);
    assert_eq!(day.status, Some(AttendanceStatus::CheckedOut));
}

#[test]
fn test_checkout_closes_open_break() {
    let mut day = AttendanceDay::none();
    day.check_in(at("2025-03-12T09:00:00Z")).expect("check in");
    day.start_break(at("2025-03-12T10:00:00Z")).expect("break");

    let summary = day.check_out(at("2025-03-12T10:30:00Z")).expect("check out");
    assert_eq!(summary.closed_break_minutes, Some(30));
    assert_eq!(summary.break_minutes, 30);
    assert_eq!(summary.working_minutes, 60);
    assert_eq!(day.open_break_since, None);
}

#[test]
fn test_illegal_transitions() {
    let t = at("2025-03-12T09:00:00Z");
    let mut day = AttendanceDay::none();
    assert!(matches!(day.start_break(t), Err(AppError::Conflict(_))));
    assert!(matches!(day.end_break(t), Err(AppError::Conflict(_))));
    assert!(matches!(day.check_out(t), Err(AppError::Conflict(_))));

    day.check_in(t).expect("check in");
    assert!(matches!(day.check_in(t), Err(AppError::Conflict(_))));
    assert!(matches!(day.end_break(t), Err(AppError::Conflict(_))));

    day.start_break(t).expect("break");
    assert!(matches!(day.start_break(t), Err(AppError::Conflict(_))));

    day.check_out(t).expect("check out");
    match day.check_out(t) {
        Err(AppError::Conflict(msg)) => assert_eq!(msg, "Already checked out today"),
        other => panic!("expected conflict, got {other:?}"),
    }
    assert!(matches!(day.start_break(t), Err(AppError::Conflict(_))));
}
