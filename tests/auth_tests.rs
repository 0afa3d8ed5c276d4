mod common;
use common::{NOW, as_user, err_json, kin, ok_json, world};

#[test]
fn test_missing_and_unknown_tokens() {
    let w = world("auth_tokens");

    let e = err_json(kin().args(["--db", &w.db, "auth", "me"]), 3);
    assert_eq!(e["success"], false);
    assert_eq!(e["kind"], "unauthorized");
    assert_eq!(e["status"], 401);
    assert_eq!(e["error"], "No token provided");

    let e = err_json(as_user(&w.db, "tok-nobody").args(["auth", "me"]), 3);
    assert_eq!(e["error"], "Invalid or expired token");

    // the environment variable is honoured too
    let v = ok_json(kin().env("KINEMATIC_TOKEN", w.exec).args(["--db", &w.db, "auth", "me"]));
    assert_eq!(v["data"]["id"], w.exec_id);
}

#[test]
fn test_me_includes_zone() {
    let w = world("auth_me");
    let v = ok_json(as_user(&w.db, w.exec).args(["auth", "me"]));
    assert_eq!(v["data"]["name"], "Ravi");
    assert_eq!(v["data"]["role"], "executive");
    assert_eq!(v["data"]["supervisor_id"], w.supervisor_id);
    assert_eq!(v["data"]["zone"]["name"], "Andheri");
    assert_eq!(v["data"]["zone"]["geofence_radius"], 100);
}

#[test]
fn test_deactivated_account_is_forbidden() {
    let w = world("auth_deactivated");
    let user = w.other_id.to_string();

    let v = ok_json(kin().args(["--db", &w.db, "--now", NOW, "provision", "deactivate", "--user", &user]));
    assert_eq!(v["data"]["is_active"], false);

    let e = err_json(as_user(&w.db, w.other).args(["auth", "me"]), 4);
    assert_eq!(e["error"], "Account is deactivated");

    ok_json(kin().args(["--db", &w.db, "provision", "activate", "--user", &user]));
    ok_json(as_user(&w.db, w.other).args(["auth", "me"]));

    err_json(kin().args(["--db", &w.db, "provision", "activate", "--user", "999"]), 5);
}

#[test]
fn test_logout_revokes_credential() {
    let w = world("auth_logout");
    let v = ok_json(as_user(&w.db, w.exec).args(["auth", "logout"]));
    assert_eq!(v["message"], "Logged out successfully");

    let e = err_json(as_user(&w.db, w.exec).args(["auth", "me"]), 3);
    assert_eq!(e["error"], "Invalid or expired token");

    // other sessions are untouched
    ok_json(as_user(&w.db, w.supervisor).args(["auth", "me"]));
}

#[test]
fn test_provisioning_guards() {
    let w = world("auth_provision");
    let org = w.org.to_string();

    let e = err_json(
        kin().args([
            "--db", &w.db, "provision", "user", "--org", &org, "--name", "Dup", "--mobile", "9811111111",
            "--credential", "tok-exec",
        ]),
        6,
    );
    assert_eq!(e["error"], "Token already in use");

    err_json(
        kin().args([
            "--db", &w.db, "provision", "user", "--org", &org, "--name", "Ghost", "--mobile", "9811111112",
            "--supervisor", "999",
        ]),
        5,
    );

    err_json(
        kin().args([
            "--db", &w.db, "provision", "user", "--org", &org, "--name", "Odd", "--mobile", "9811111113",
            "--role", "intern",
        ]),
        2,
    );

    // generated credentials work straight away
    let v = ok_json(kin().args([
        "--db", &w.db, "provision", "user", "--org", &org, "--name", "Kiran", "--mobile", "9811111114",
    ]));
    let token = v["data"]["token"].as_str().expect("token").to_string();
    assert!(token.starts_with("kin_"));
    let v = ok_json(as_user(&w.db, &token).args(["auth", "me"]));
    assert_eq!(v["data"]["name"], "Kiran");
    assert!(v["data"]["zone"].is_null());
}
