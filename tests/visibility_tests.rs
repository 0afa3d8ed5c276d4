use chrono::{DateTime, Utc};
use kinematic::core::visibility::{mask_answer_key, redact_anonymous, scope_to_team};
use kinematic::models::broadcast::{BroadcastQuestion, QuestionStatus, QuizOption};
use kinematic::models::grievance::{Grievance, GrievanceCategory, GrievanceStatus, Submitter};
use kinematic::models::role::Role;
use kinematic::models::user::UserProfile;

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_741_770_000, 0).expect("valid timestamp")
}

fn grievance(id: i64, anonymous: bool) -> Grievance {
    Grievance {
        id,
        reference_no: format!("GRV-20250312-{:05}", id),
        org_id: 1,
        submitted_by: Some(7),
        category: GrievanceCategory::Other,
        against_role: None,
        incident_date: None,
        description: "The van never arrived at the depot.".into(),
        evidence_urls: vec![],
        is_anonymous: anonymous,
        status: GrievanceStatus::Submitted,
        resolution: None,
        reviewed_by: None,
        reviewed_at: None,
        created_at: epoch(),
        submitter: Some(Submitter {
            name: "Ravi".into(),
            employee_id: Some("EMP-7".into()),
            role: Role::Executive,
            zone_id: Some(1),
        }),
    }
}

fn question() -> BroadcastQuestion {
    let option = |label: &str, correct: bool| QuizOption {
        label: label.into(),
        value: label.to_lowercase(),
        is_correct: Some(correct),
    };
    BroadcastQuestion {
        id: 1,
        org_id: 1,
        created_by: 1,
        question: "Best shelf position?".into(),
        options: vec![option("Eye", true), option("Floor", false)],
        correct_option: Some(0),
        is_urgent: false,
        deadline_at: None,
        target_roles: vec!["executive".into()],
        target_zone_ids: vec![],
        status: QuestionStatus::Active,
        created_at: epoch(),
    }
}

fn profile(id: i64, role: Role) -> UserProfile {
    UserProfile {
        id,
        org_id: 1,
        name: format!("user {id}"),
        mobile: "9800000000".into(),
        employee_id: None,
        role,
        zone_id: Some(1),
        supervisor_id: None,
        fcm_token: None,
        is_active: true,
        created_at: "2025-03-12T09:00:00Z".into(),
    }
}

#[test]
fn test_role_tiers() {
    assert!(Role::SuperAdmin.at_least(Role::CityManager));
    assert!(Role::CityManager.at_least(Role::CityManager));
    assert!(!Role::Supervisor.at_least(Role::CityManager));
    assert!(Role::Supervisor.is_management());
    assert!(!Role::Supervisor.is_administrative());
    assert!(!Role::Executive.is_management());
    assert_eq!(Role::from_db_str("city_manager"), Some(Role::CityManager));
    assert_eq!(Role::from_db_str("CEO"), None);
}

#[test]
fn test_redact_only_touches_anonymous_rows() {
    let rows = redact_anonymous(vec![grievance(1, true), grievance(2, false)]);
    assert_eq!(rows[0].submitted_by, None);
    assert!(rows[0].submitter.is_none());
    assert_eq!(rows[0].description, "The van never arrived at the depot.");
    assert_eq!(rows[1].submitted_by, Some(7));
    assert!(rows[1].submitter.is_some());
}

#[test]
fn test_answer_key_masked_below_city_manager() {
    for role in [Role::Executive, Role::Supervisor] {
        let q = mask_answer_key(role, question());
        assert_eq!(q.correct_option, None);
        assert!(q.options.iter().all(|o| o.is_correct.is_none()));
    }
    for role in [Role::CityManager, Role::Admin, Role::SuperAdmin] {
        let q = mask_answer_key(role, question());
        assert_eq!(q.correct_option, Some(0));
        assert_eq!(q.options[0].is_correct, Some(true));
    }
}

#[test]
fn test_supervisor_sees_direct_reports_only() {
    // (user id, supervisor id)
    let rows = vec![(10, Some(2)), (11, Some(3)), (12, None), (13, Some(2))];

    let mine = scope_to_team(&profile(2, Role::Supervisor), rows.clone(), |r| r.1);
    assert_eq!(mine.iter().map(|r| r.0).collect::<Vec<_>>(), vec![10, 13]);

    let all = scope_to_team(&profile(1, Role::CityManager), rows.clone(), |r| r.1);
    assert_eq!(all.len(), 4);
}

#[test]
fn test_question_status_codes() {
    for st in [QuestionStatus::Active, QuestionStatus::Closed] {
        assert_eq!(QuestionStatus::from_db_str(st.to_db_str()), Some(st));
    }
    assert_eq!(QuestionStatus::from_db_str("archived"), None);
    assert_eq!(
        serde_json::to_value(QuestionStatus::Closed).expect("serialize"),
        serde_json::json!("closed")
    );
}
