use chrono::{DateTime, Utc};
use kinematic::core::attendance::{AttendanceLogic, CheckInRequest, CheckOutRequest};
use kinematic::core::auth::{Session, StoreIdentity, open_session};
use kinematic::core::calculator::geofence::Coordinates;
use kinematic::core::provision::ProvisionLogic;
use kinematic::core::sos::{SosLogic, TriggerRequest};
use kinematic::db::pool::DbPool;
use kinematic::db::to_count;
use kinematic::errors::AppError;
use kinematic::models::attendance::AttendanceStatus;
use kinematic::models::role::Role;
use kinematic::models::user::NewUser;
use kinematic::models::zone::NewZone;
use kinematic::utils::pagination::PageRequest;

const MEETING: (f64, f64) = (19.0760, 72.8777);

fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid instant")
        .with_timezone(&Utc)
}

struct Fixture {
    pool: DbPool,
    org: i64,
    zone: i64,
}

fn fixture() -> Fixture {
    let now = at("2025-03-12T08:00:00Z");
    let mut pool = DbPool::in_memory().expect("in-memory db");
    let org = ProvisionLogic::org(&mut pool, "Acme", now).expect("org").id;
    let zone = NewZone {
        org_id: org,
        name: "Andheri".into(),
        city: Some("Mumbai".into()),
        meeting_point: Coordinates::new(MEETING.0, MEETING.1).expect("coords"),
        meeting_address: None,
        geofence_radius: 100,
    };
    let zone = ProvisionLogic::zone(&mut pool, &zone).expect("zone").id;
    Fixture { pool, org, zone }
}

fn add_user(
    f: &mut Fixture,
    name: &str,
    role: Role,
    token: &str,
    supervisor_id: Option<i64>,
) -> i64 {
    let user = NewUser {
        org_id: f.org,
        name: name.into(),
        mobile: "9800000000".into(),
        employee_id: None,
        role,
        zone_id: Some(f.zone),
        supervisor_id,
        is_active: true,
    };
    ProvisionLogic::user(&mut f.pool, &user, Some(token), at("2025-03-12T08:00:00Z"))
        .expect("user")
        .profile
        .id
}

fn session(pool: DbPool, token: &str, now: &str) -> Session {
    open_session(pool, &StoreIdentity, Some(token), at(now)).expect("session")
}

#[test]
fn test_authentication_failures() {
    let mut f = fixture();
    add_user(&mut f, "Ravi", Role::Executive, "tok-exec", None);

    let pool = f.pool;
    let err = open_session(pool, &StoreIdentity, None, Utc::now()).err();
    assert!(matches!(err, Some(AppError::Unauthorized(_))));

    let pool = DbPool::in_memory().expect("db");
    let err = open_session(pool, &StoreIdentity, Some("   "), Utc::now()).err();
    assert!(matches!(err, Some(AppError::Unauthorized(_))));
}

#[test]
fn test_role_gate_on_session() {
    let mut f = fixture();
    add_user(&mut f, "Ravi", Role::Executive, "tok-exec", None);
    let s = session(f.pool, "tok-exec", "2025-03-12T09:00:00Z");
    assert!(s.require(Role::Executive).is_ok());
    match s.require(Role::Supervisor) {
        Err(AppError::Forbidden(msg)) => assert_eq!(msg, "Insufficient permissions"),
        other => panic!("expected forbidden, got {other:?}"),
    }
}

#[test]
fn test_sos_recipients_are_frozen_at_trigger_time() {
    let mut f = fixture();
    let sup = add_user(&mut f, "Sunil", Role::Supervisor, "tok-sup", None);
    let mgr = add_user(&mut f, "Meera", Role::CityManager, "tok-mgr", None);
    let admin = add_user(&mut f, "Asha", Role::Admin, "tok-admin", None);
    add_user(&mut f, "Ravi", Role::Executive, "tok-exec", Some(sup));

    let req = TriggerRequest {
        coords: Coordinates::new(19.0, 72.8).expect("coords"),
        address: None,
        message: Some("Help".into()),
    };
    let mut s = session(f.pool, "tok-exec", "2025-03-12T09:00:00Z");
    let first = SosLogic::trigger(&mut s, &req).expect("trigger");
    assert_eq!(first.notified_user_ids.ids(), &[sup, mgr, admin]);

    // a manager joining later is not added to the existing alert
    let mut pool = s.pool;
    let new_user = NewUser {
        org_id: f.org,
        name: "Late".into(),
        mobile: "9800000001".into(),
        employee_id: None,
        role: Role::CityManager,
        zone_id: None,
        supervisor_id: None,
        is_active: true,
    };
    let late = ProvisionLogic::user(&mut pool, &new_user, Some("tok-late"), at("2025-03-12T09:05:00Z"))
        .expect("late manager")
        .profile
        .id;

    let mut s = session(pool, "tok-sup", "2025-03-12T09:10:00Z");
    let acked = SosLogic::acknowledge(&mut s, first.id).expect("ack");
    assert_eq!(acked.notified_user_ids.ids(), &[sup, mgr, admin]);

    let listed = SosLogic::list(&s, None).expect("list");
    assert_eq!(listed.len(), 1);
    assert!(!listed[0].notified_user_ids.ids().contains(&late));

    let mut s = session(s.pool, "tok-exec", "2025-03-12T09:20:00Z");
    let second = SosLogic::trigger(&mut s, &req).expect("second trigger");
    assert!(second.notified_user_ids.ids().contains(&late));
}

#[test]
fn test_attendance_day_through_sessions() {
    let mut f = fixture();
    add_user(&mut f, "Ravi", Role::Executive, "tok-exec", None);
    let here = Coordinates::new(MEETING.0, MEETING.1).expect("coords");

    let mut s = session(f.pool, "tok-exec", "2025-03-12T09:00:00Z");
    let record = AttendanceLogic::check_in(
        &mut s,
        &CheckInRequest {
            coords: here,
            zone_id: None,
            selfie_url: None,
            activity_id: None,
        },
    )
    .expect("check in");
    assert_eq!(record.status, AttendanceStatus::CheckedIn);
    assert_eq!(record.checkin_distance_m, 0);

    let mut s = session(s.pool, "tok-exec", "2025-03-12T13:00:00Z");
    AttendanceLogic::start_break(&mut s).expect("break");

    let mut s = session(s.pool, "tok-exec", "2025-03-12T13:15:00Z");
    let ended = AttendanceLogic::end_break(&mut s).expect("end break");
    assert_eq!(ended.break_duration_minutes, 15);

    let mut s = session(s.pool, "tok-exec", "2025-03-12T17:00:00Z");
    let done = AttendanceLogic::check_out(
        &mut s,
        &CheckOutRequest {
            coords: here,
            selfie_url: None,
        },
    )
    .expect("check out");
    assert_eq!(done.status, AttendanceStatus::CheckedOut);
    assert_eq!(done.break_minutes, 15);
    assert_eq!(done.working_minutes, Some(465));

    // a new day starts from scratch
    let s = session(s.pool, "tok-exec", "2025-03-13T08:00:00Z");
    assert!(AttendanceLogic::today(&s).expect("today").is_none());
}

#[test]
fn test_history_totals_through_sessions() {
    let mut f = fixture();
    add_user(&mut f, "Ravi", Role::Executive, "tok-exec", None);
    let here = Coordinates::new(MEETING.0, MEETING.1).expect("coords");

    let mut pool = f.pool;
    for day in ["2025-03-10", "2025-03-11", "2025-03-12"] {
        let mut s = session(pool, "tok-exec", &format!("{day}T09:00:00Z"));
        AttendanceLogic::check_in(
            &mut s,
            &CheckInRequest {
                coords: here,
                zone_id: None,
                selfie_url: None,
                activity_id: None,
            },
        )
        .expect("check in");
        pool = s.pool;
    }

    let s = session(pool, "tok-exec", "2025-03-12T18:00:00Z");
    let page = AttendanceLogic::history(&s, PageRequest::new(Some(2), Some(2), 20, 100))
        .expect("history");
    assert_eq!(page.pagination.total, 3);
    assert_eq!(page.pagination.total_pages, 2);
    assert_eq!(page.data.len(), 1);
    assert!(page.pagination.has_prev);
    assert!(!page.pagination.has_next);
}

#[test]
fn test_count_conversion() {
    assert_eq!(to_count(0), 0);
    assert_eq!(to_count(42), 42);
    assert_eq!(to_count(-1), 0);
}

#[test]
fn test_generated_credentials_are_unpredictable() {
    let mut f = fixture();
    let now = at("2025-03-12T08:00:00Z");
    let mut tokens = Vec::new();
    for name in ["Kiran", "Kavya"] {
        let user = NewUser {
            org_id: f.org,
            name: name.into(),
            mobile: "9800000002".into(),
            employee_id: None,
            role: Role::Executive,
            zone_id: None,
            supervisor_id: None,
            is_active: true,
        };
        let made = ProvisionLogic::user(&mut f.pool, &user, None, now).expect("user");
        let guess = format!("kin_{}_{:x}", made.profile.id, now.timestamp_micros());
        assert_ne!(made.token, guess);
        assert!(!made.token.contains(&format!("{:x}", now.timestamp_micros())));
        // kin_ + 32 hex digits
        assert_eq!(made.token.len(), 36);
        assert!(made.token[4..].chars().all(|c| c.is_ascii_hexdigit()));
        tokens.push(made.token);
    }
    assert_ne!(tokens[0], tokens[1]);

    let s = session(f.pool, &tokens[1], "2025-03-12T09:00:00Z");
    assert_eq!(s.caller.name, "Kavya");
}
