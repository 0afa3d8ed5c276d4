mod common;
use common::{NOW, as_user, err_json, kin, ok_json, provision_user, world};

const DESCRIPTION: &str = "Supervisor shouted at the team during the morning briefing.";

#[test]
fn test_anonymous_grievance_is_redacted_for_admins_only() {
    let w = world("grv_anonymous");

    let v = ok_json(as_user(&w.db, w.exec).args([
        "grievance",
        "submit",
        "--category",
        "harassment_misconduct",
        "--against-role",
        "supervisor",
        "--description",
        DESCRIPTION,
        "--anonymous",
    ]));
    assert_eq!(v["data"]["reference_no"], "GRV-20250312-00001");
    assert_eq!(v["data"]["status"], "submitted");
    assert_eq!(v["message"], "Grievance submitted. HR will review within 48 hours.");

    let v = ok_json(as_user(&w.db, w.manager).args(["grievance", "all"]));
    let row = &v["data"]["data"][0];
    assert_eq!(row["is_anonymous"], true);
    assert!(row["submitted_by"].is_null());
    assert!(row["submitter"].is_null());

    let v = ok_json(as_user(&w.db, w.exec).args(["grievance", "mine"]));
    assert_eq!(v["data"][0]["submitted_by"], w.exec_id);
}

#[test]
fn test_named_grievance_keeps_submitter() {
    let w = world("grv_named");
    ok_json(as_user(&w.db, w.other).args([
        "grievance",
        "submit",
        "--category",
        "payment_salary",
        "--description",
        DESCRIPTION,
        "--incident-date",
        "2025-03-10",
        "--evidence",
        "https://files.example/a.jpg",
        "--evidence",
        "https://files.example/b.jpg",
    ]));

    let v = ok_json(as_user(&w.db, w.manager).args(["grievance", "all"]));
    let row = &v["data"]["data"][0];
    assert_eq!(row["submitted_by"], w.other_id);
    assert_eq!(row["submitter"]["name"], "Anita");
    assert_eq!(row["evidence_urls"].as_array().map(Vec::len), Some(2));
    assert_eq!(row["incident_date"], "2025-03-10");
}

#[test]
fn test_submission_validation_and_review() {
    let w = world("grv_review");

    let e = err_json(
        as_user(&w.db, w.exec).args(["grievance", "submit", "--category", "payment_salary", "--description", "too short"]),
        2,
    );
    assert_eq!(e["details"][0]["field"], "description");

    err_json(
        as_user(&w.db, w.exec).args(["grievance", "submit", "--category", "weather", "--description", DESCRIPTION]),
        2,
    );

    let v = ok_json(as_user(&w.db, w.exec).args([
        "grievance",
        "submit",
        "--category",
        "payment_salary",
        "--description",
        DESCRIPTION,
    ]));
    let id = v["data"]["id"].as_i64().expect("id").to_string();

    // a second grievance on the same day gets the next sequence number
    let v = ok_json(as_user(&w.db, w.other).args([
        "grievance",
        "submit",
        "--category",
        "other",
        "--description",
        DESCRIPTION,
    ]));
    assert_eq!(v["data"]["reference_no"], "GRV-20250312-00002");

    err_json(as_user(&w.db, w.exec).args(["grievance", "all"]), 4);
    err_json(as_user(&w.db, w.supervisor).args(["grievance", "update", &id, "--status", "resolved"]), 4);
    err_json(as_user(&w.db, w.manager).args(["grievance", "update", &id, "--status", "submitted"]), 2);

    let v = ok_json(as_user(&w.db, w.manager).args([
        "grievance",
        "update",
        &id,
        "--status",
        "resolved",
        "--resolution",
        "Arrears paid",
    ]));
    assert_eq!(v["data"]["status"], "resolved");
    assert_eq!(v["data"]["resolution"], "Arrears paid");
    assert_eq!(v["data"]["reviewed_by"], w.manager_id);
    assert_eq!(v["message"], "Status updated");

    let v = ok_json(as_user(&w.db, w.manager).args(["grievance", "all", "--status", "resolved"]));
    assert_eq!(v["data"]["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(v["data"]["pagination"]["total"], 1);

    err_json(as_user(&w.db, w.manager).args(["grievance", "update", "999", "--status", "dismissed"]), 5);
}

#[test]
fn test_admin_listing_is_paginated() {
    let w = world("grv_paging");
    for token in [w.exec, w.other, w.exec] {
        ok_json(as_user(&w.db, token).args([
            "grievance",
            "submit",
            "--category",
            "other",
            "--description",
            DESCRIPTION,
        ]));
    }

    let v = ok_json(as_user(&w.db, w.manager).args(["grievance", "all", "--limit", "2"]));
    assert_eq!(v["data"]["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(v["data"]["pagination"]["total"], 3);
    assert_eq!(v["data"]["pagination"]["totalPages"], 2);
    assert_eq!(v["data"]["pagination"]["hasNext"], true);

    let v = ok_json(as_user(&w.db, w.manager).args(["grievance", "all", "--limit", "2", "--page", "2"]));
    assert_eq!(v["data"]["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(v["data"]["pagination"]["hasPrev"], true);
    assert_eq!(v["data"]["data"][0]["reference_no"], "GRV-20250312-00001");
}

#[test]
fn test_reference_sequence_spans_organisations() {
    let w = world("grv_cross_org");
    ok_json(as_user(&w.db, w.exec).args([
        "grievance",
        "submit",
        "--category",
        "other",
        "--description",
        DESCRIPTION,
    ]));

    let org = ok_json(kin().args(["--db", &w.db, "--now", NOW, "provision", "org", "--name", "Beta"]))
        ["data"]["id"]
        .as_i64()
        .expect("org id");
    provision_user(&w.db, org, "Zara", "executive", "tok-beta", None, None);

    let v = ok_json(as_user(&w.db, "tok-beta").args([
        "grievance",
        "submit",
        "--category",
        "other",
        "--description",
        DESCRIPTION,
    ]));
    assert_eq!(v["data"]["reference_no"], "GRV-20250312-00002");

    // each organisation still only sees its own cases
    let v = ok_json(as_user(&w.db, w.manager).args(["grievance", "all"]));
    assert_eq!(v["data"]["pagination"]["total"], 1);
}
