#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use serde_json::Value;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Wednesday morning, the pinned clock most tests run at.
pub const NOW: &str = "2025-03-12T09:00:00Z";

/// Meeting point of the fixture zone (radius 100 m).
pub const ZONE_LAT: f64 = 19.0760;
pub const ZONE_LNG: f64 = 72.8777;

pub fn kin() -> Command {
    let mut cmd = cargo_bin_cmd!("kinematic");
    cmd.env_remove("KINEMATIC_TOKEN");
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_kinematic.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Empty storage directory for upload tests
pub fn setup_storage(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_kinematic_storage", name));
    fs::remove_dir_all(&path).ok();
    path.to_string_lossy().to_string()
}

pub fn init_db(db_path: &str) {
    kin()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Run successfully and parse the JSON envelope printed on stdout.
pub fn ok_json(cmd: &mut Command) -> Value {
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).expect("stdout should be a JSON envelope")
}

/// Run, expect the given exit code, and parse the error envelope from stderr.
pub fn err_json(cmd: &mut Command, code: i32) -> Value {
    let out = cmd.assert().failure().code(code).get_output().stderr.clone();
    serde_json::from_slice(&out).expect("stderr should be a JSON error envelope")
}

/// A caller-bound command at the default clock.
pub fn as_user(db_path: &str, token: &str) -> Command {
    at(db_path, token, NOW)
}

/// A caller-bound command at a given instant.
pub fn at(db_path: &str, token: &str, now: &str) -> Command {
    let mut cmd = kin();
    cmd.args(["--db", db_path, "--token", token, "--now", now]);
    cmd
}

/// Organisation fixture: one zone, a city manager, a supervisor, a supervised
/// executive and an executive reporting to nobody.
pub struct World {
    pub db: String,
    pub org: i64,
    pub zone: i64,
    pub manager: &'static str,
    pub manager_id: i64,
    pub supervisor: &'static str,
    pub supervisor_id: i64,
    pub exec: &'static str,
    pub exec_id: i64,
    pub other: &'static str,
    pub other_id: i64,
}

fn provision(db_path: &str, args: &[&str]) -> Value {
    let mut cmd = kin();
    cmd.args(["--db", db_path, "--now", NOW, "provision"]).args(args);
    ok_json(&mut cmd)
}

pub fn provision_user(
    db_path: &str,
    org: i64,
    name: &str,
    role: &str,
    credential: &str,
    zone: Option<i64>,
    supervisor: Option<i64>,
) -> i64 {
    let org = org.to_string();
    let mut args = vec![
        "user".to_string(),
        "--org".into(),
        org,
        "--name".into(),
        name.into(),
        "--mobile".into(),
        "9800000000".into(),
        "--role".into(),
        role.into(),
        "--credential".into(),
        credential.into(),
    ];
    if let Some(z) = zone {
        args.push("--zone".into());
        args.push(z.to_string());
    }
    if let Some(s) = supervisor {
        args.push("--supervisor".into());
        args.push(s.to_string());
    }
    let refs: Vec<&str> = args.iter().map(String::as_str).collect();
    let v = provision(db_path, &refs);
    assert_eq!(v["data"]["token"], credential);
    v["data"]["id"].as_i64().expect("user id")
}

pub fn world(name: &str) -> World {
    let db = setup_test_db(name);
    init_db(&db);

    let org = provision(&db, &["org", "--name", "Acme Field Ops"])["data"]["id"]
        .as_i64()
        .expect("org id");
    let org_s = org.to_string();
    let lat = ZONE_LAT.to_string();
    let lng = ZONE_LNG.to_string();
    let zone = provision(
        &db,
        &[
            "zone", "--org", &org_s, "--name", "Andheri", "--city", "Mumbai", "--lat", &lat,
            "--lng", &lng, "--radius", "100",
        ],
    )["data"]["id"]
        .as_i64()
        .expect("zone id");

    let manager_id = provision_user(&db, org, "Meera", "city_manager", "tok-manager", Some(zone), None);
    let supervisor_id = provision_user(&db, org, "Sunil", "supervisor", "tok-supervisor", Some(zone), None);
    let exec_id = provision_user(
        &db,
        org,
        "Ravi",
        "executive",
        "tok-exec",
        Some(zone),
        Some(supervisor_id),
    );
    let other_id = provision_user(&db, org, "Anita", "executive", "tok-other", Some(zone), None);

    World {
        db,
        org,
        zone,
        manager: "tok-manager",
        manager_id,
        supervisor: "tok-supervisor",
        supervisor_id,
        exec: "tok-exec",
        exec_id,
        other: "tok-other",
        other_id,
    }
}
