use predicates::str::contains;

mod common;
use common::{ZONE_LAT, ZONE_LNG, as_user, at, err_json, ok_json, world};

fn checkin(db: &str, token: &str, now: &str, lat: f64) -> assert_cmd::Command {
    let mut cmd = at(db, token, now);
    cmd.args([
        "attendance",
        "checkin",
        "--lat",
        &lat.to_string(),
        "--lng",
        &ZONE_LNG.to_string(),
    ]);
    cmd
}

#[test]
fn test_full_day_scenario() {
    let w = world("att_full_day");

    // 0.00036° of latitude is about 40 m north of the meeting point
    let v = ok_json(&mut checkin(&w.db, w.exec, "2025-03-12T09:00:00Z", ZONE_LAT + 0.00036));
    assert_eq!(v["success"], true);
    assert_eq!(v["data"]["status"], "checked_in");
    assert_eq!(v["data"]["checkin_distance_m"], 40);
    assert_eq!(v["data"]["zone_id"], w.zone);

    let e = err_json(
        &mut checkin(&w.db, w.exec, "2025-03-12T09:30:00Z", ZONE_LAT),
        6,
    );
    assert_eq!(e["kind"], "conflict");
    assert_eq!(e["error"], "Already checked in today");

    let v = ok_json(
        at(&w.db, w.exec, "2025-03-12T12:00:00Z").args(["attendance", "break-start"]),
    );
    assert!(v["data"]["ended_at"].is_null());

    let v = ok_json(at(&w.db, w.exec, "2025-03-12T12:15:00Z").args(["attendance", "break-end"]));
    assert_eq!(v["data"]["break_duration_minutes"], 15);

    let v = ok_json(at(&w.db, w.exec, "2025-03-12T17:00:00Z").args([
        "attendance",
        "checkout",
        "--lat",
        &ZONE_LAT.to_string(),
        "--lng",
        &ZONE_LNG.to_string(),
    ]));
    assert_eq!(v["data"]["status"], "checked_out");
    assert_eq!(v["data"]["break_minutes"], 15);
    assert_eq!(v["data"]["working_minutes"], 465);
    assert_eq!(v["message"], "Checked out. Worked 07h 45m");

    let e = err_json(
        at(&w.db, w.exec, "2025-03-12T17:05:00Z").args([
            "attendance",
            "checkout",
            "--lat",
            &ZONE_LAT.to_string(),
            "--lng",
            &ZONE_LNG.to_string(),
        ]),
        6,
    );
    assert_eq!(e["error"], "Already checked out today");

    let v = ok_json(at(&w.db, w.exec, "2025-03-12T18:00:00Z").args(["attendance", "today"]));
    assert_eq!(v["data"]["working_minutes"], 465);
    assert_eq!(v["data"]["breaks"].as_array().map(Vec::len), Some(1));
}

#[test]
fn test_checkin_outside_fence_is_rejected() {
    let w = world("att_outside_fence");

    // 0.003° is roughly 334 m away
    let e = err_json(&mut checkin(&w.db, w.exec, common::NOW, ZONE_LAT + 0.003), 2);
    assert_eq!(e["kind"], "geofence_violation");
    assert_eq!(e["status"], 400);
    assert_eq!(e["details"]["required"], 100);
    assert_eq!(e["details"]["distance"], 334);
    assert!(e["error"].as_str().unwrap_or_default().contains("Andheri"));

    // nothing was recorded
    let v = ok_json(as_user(&w.db, w.exec).args(["attendance", "today"]));
    assert!(v["data"].is_null());
}

#[test]
fn test_out_of_range_coordinates() {
    let w = world("att_bad_coords");
    let e = err_json(&mut checkin(&w.db, w.exec, common::NOW, 95.0), 2);
    assert_eq!(e["kind"], "validation");
    assert_eq!(e["details"][0]["field"], "latitude");
}

#[test]
fn test_break_and_checkout_order() {
    let w = world("att_order");

    let e = err_json(as_user(&w.db, w.exec).args(["attendance", "break-start"]), 6);
    assert_eq!(e["error"], "Not checked in today");

    let e = err_json(
        as_user(&w.db, w.exec).args([
            "attendance",
            "checkout",
            "--lat",
            "19.076",
            "--lng",
            "72.8777",
        ]),
        6,
    );
    assert_eq!(e["error"], "No check-in found for today");

    ok_json(&mut checkin(&w.db, w.exec, common::NOW, ZONE_LAT));

    let e = err_json(as_user(&w.db, w.exec).args(["attendance", "break-end"]), 6);
    assert_eq!(e["kind"], "conflict");

    ok_json(at(&w.db, w.exec, "2025-03-12T10:00:00Z").args(["attendance", "break-start"]));
    let e = err_json(
        at(&w.db, w.exec, "2025-03-12T10:01:00Z").args(["attendance", "break-start"]),
        6,
    );
    assert_eq!(e["kind"], "conflict");

    // checkout while on break closes the open break first
    let v = ok_json(at(&w.db, w.exec, "2025-03-12T10:30:00Z").args([
        "attendance",
        "checkout",
        "--lat",
        "19.076",
        "--lng",
        "72.8777",
    ]));
    assert_eq!(v["data"]["break_minutes"], 30);
    assert_eq!(v["data"]["working_minutes"], 60);
}

#[test]
fn test_explicit_unknown_zone_is_not_found() {
    let w = world("att_unknown_zone");
    let mut cmd = checkin(&w.db, w.exec, common::NOW, ZONE_LAT);
    cmd.args(["--zone", "999"]);
    let e = err_json(&mut cmd, 5);
    assert_eq!(e["error"], "Zone not found");
}

#[test]
fn test_team_listing_is_scoped_for_supervisors() {
    let w = world("att_team_scope");
    ok_json(&mut checkin(&w.db, w.exec, common::NOW, ZONE_LAT));
    ok_json(&mut checkin(&w.db, w.other, common::NOW, ZONE_LAT));

    let v = ok_json(as_user(&w.db, w.supervisor).args(["attendance", "team"]));
    let team = v["data"].as_array().expect("team array");
    assert_eq!(team.len(), 1);
    assert_eq!(team[0]["user_id"], w.exec_id);

    let v = ok_json(as_user(&w.db, w.manager).args(["attendance", "team"]));
    assert_eq!(v["data"].as_array().map(Vec::len), Some(2));

    let e = err_json(as_user(&w.db, w.exec).args(["attendance", "team"]), 4);
    assert_eq!(e["kind"], "forbidden");
}

#[test]
fn test_history_is_paginated() {
    let w = world("att_history");
    for day in ["10", "11", "12"] {
        let now = format!("2025-03-{}T09:00:00Z", day);
        ok_json(&mut checkin(&w.db, w.exec, &now, ZONE_LAT));
    }

    let v = ok_json(as_user(&w.db, w.exec).args(["attendance", "history", "--limit", "2"]));
    assert_eq!(v["data"]["pagination"]["total"], 3);
    assert_eq!(v["data"]["pagination"]["totalPages"], 2);
    assert_eq!(v["data"]["pagination"]["hasNext"], true);
    assert_eq!(v["data"]["data"][0]["date"], "2025-03-12");
}

#[test]
fn test_checkin_with_selfie_file() {
    let w = world("att_selfie");
    let storage = common::setup_storage("att_selfie");
    let selfie = std::env::temp_dir().join("att_selfie_face.jpg");
    std::fs::write(&selfie, b"\xFF\xD8\xFFfake-jpeg").expect("write selfie");

    let mut cmd = checkin(&w.db, w.exec, common::NOW, ZONE_LAT);
    cmd.args(["--storage", &storage, "--selfie", selfie.to_str().expect("utf8 path")]);
    let v = ok_json(&mut cmd);
    let url = v["data"]["checkin_selfie_url"].as_str().expect("selfie url");
    assert!(url.starts_with("file://"));
    assert!(url.contains("selfies"));
    assert!(url.ends_with(".jpg"));
}

#[test]
fn test_log_records_attendance() {
    let w = world("att_log");
    ok_json(&mut checkin(&w.db, w.exec, common::NOW, ZONE_LAT));

    common::kin()
        .args(["--db", &w.db, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("checkin"))
        .stdout(contains("provision_user"));
}

fn stored_objects(dir: &std::path::Path) -> usize {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .map(|e| {
                let p = e.path();
                if p.is_dir() { stored_objects(&p) } else { 1 }
            })
            .sum(),
        Err(_) => 0,
    }
}

#[test]
fn test_rejected_checkin_keeps_no_selfie() {
    let w = world("att_selfie_rejected");
    let storage = common::setup_storage("att_selfie_rejected");
    let selfie = std::env::temp_dir().join("att_selfie_rejected_face.jpg");
    std::fs::write(&selfie, b"\xFF\xD8\xFFfake-jpeg").expect("write selfie");
    let selfie = selfie.to_str().expect("utf8 path").to_string();

    // outside the fence
    let mut cmd = checkin(&w.db, w.exec, common::NOW, ZONE_LAT + 0.003);
    cmd.args(["--storage", &storage, "--selfie", &selfie]);
    let e = err_json(&mut cmd, 2);
    assert_eq!(e["kind"], "geofence_violation");
    assert_eq!(stored_objects(std::path::Path::new(&storage)), 0);

    // a second check-in the same day
    let mut cmd = checkin(&w.db, w.exec, common::NOW, ZONE_LAT);
    cmd.args(["--storage", &storage, "--selfie", &selfie]);
    ok_json(&mut cmd);
    assert_eq!(stored_objects(std::path::Path::new(&storage)), 1);

    let mut cmd = checkin(&w.db, w.exec, "2025-03-12T10:00:00Z", ZONE_LAT);
    cmd.args(["--storage", &storage, "--selfie", &selfie]);
    err_json(&mut cmd, 6);
    assert_eq!(stored_objects(std::path::Path::new(&storage)), 1);

    // checkout before check-in on another day
    let mut cmd = at(&w.db, w.other, common::NOW);
    cmd.args([
        "attendance",
        "checkout",
        "--lat",
        &ZONE_LAT.to_string(),
        "--lng",
        &ZONE_LNG.to_string(),
        "--storage",
        &storage,
        "--selfie",
        &selfie,
    ]);
    err_json(&mut cmd, 6);
    assert_eq!(stored_objects(std::path::Path::new(&storage)), 1);
}

#[test]
fn test_second_checkin_from_outside_fence_is_conflict() {
    let w = world("att_dup_outside");
    ok_json(&mut checkin(&w.db, w.exec, common::NOW, ZONE_LAT));

    let e = err_json(
        &mut checkin(&w.db, w.exec, "2025-03-12T11:00:00Z", ZONE_LAT + 0.003),
        6,
    );
    assert_eq!(e["kind"], "conflict");
    assert_eq!(e["error"], "Already checked in today");
}
