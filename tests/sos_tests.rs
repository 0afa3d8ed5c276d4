mod common;
use common::{as_user, err_json, ok_json, world};

#[test]
fn test_trigger_notifies_supervisor_then_managers() {
    let w = world("sos_trigger");

    let v = ok_json(as_user(&w.db, w.exec).args([
        "sos",
        "trigger",
        "--lat",
        "19.0761",
        "--lng",
        "72.8778",
        "--address",
        "Andheri station, gate 2",
    ]));
    assert_eq!(v["data"]["status"], "active");
    assert_eq!(
        v["data"]["notified_user_ids"],
        serde_json::json!([w.supervisor_id, w.manager_id])
    );

    for token in [w.supervisor, w.manager] {
        let n = ok_json(as_user(&w.db, token).args(["notify", "list", "--unread"]));
        assert_eq!(n["data"]["pagination"]["total"], 1);
        assert_eq!(n["data"]["data"][0]["type"], "sos");
        assert_eq!(n["data"]["data"][0]["title"], "SOS Alert: Ravi");
    }

    // an executive without a supervisor only pages the managers
    let v = ok_json(as_user(&w.db, w.other).args(["sos", "trigger", "--lat", "19.0", "--lng", "72.8"]));
    assert_eq!(v["data"]["notified_user_ids"], serde_json::json!([w.manager_id]));
}

#[test]
fn test_alert_lifecycle_moves_forward_only() {
    let w = world("sos_lifecycle");
    let v = ok_json(as_user(&w.db, w.exec).args(["sos", "trigger", "--lat", "19.0", "--lng", "72.8"]));
    let id = v["data"]["id"].as_i64().expect("alert id").to_string();

    let e = err_json(as_user(&w.db, w.exec).args(["sos", "ack", &id]), 4);
    assert_eq!(e["kind"], "forbidden");

    let v = ok_json(as_user(&w.db, w.supervisor).args(["sos", "ack", &id]));
    assert_eq!(v["data"]["status"], "acknowledged");
    assert_eq!(v["data"]["acknowledged_by"], w.supervisor_id);

    let e = err_json(as_user(&w.db, w.manager).args(["sos", "ack", &id]), 6);
    assert_eq!(e["error"], "Alert is already acknowledged");

    let v = ok_json(as_user(&w.db, w.manager).args(["sos", "resolve", &id, "--notes", "Reached safely"]));
    assert_eq!(v["data"]["status"], "resolved");
    assert_eq!(v["data"]["resolution_notes"], "Reached safely");
    // the recipients captured at trigger time stay as they were
    assert_eq!(
        v["data"]["notified_user_ids"],
        serde_json::json!([w.supervisor_id, w.manager_id])
    );

    let e = err_json(as_user(&w.db, w.manager).args(["sos", "resolve", &id]), 6);
    assert_eq!(e["kind"], "conflict");

    let e = err_json(as_user(&w.db, w.manager).args(["sos", "ack", "999"]), 5);
    assert_eq!(e["error"], "SOS alert not found");
}

#[test]
fn test_list_filters_by_status() {
    let w = world("sos_list");
    let first = ok_json(as_user(&w.db, w.exec).args(["sos", "trigger", "--lat", "19.0", "--lng", "72.8"]));
    ok_json(as_user(&w.db, w.other).args(["sos", "trigger", "--lat", "19.0", "--lng", "72.8"]));
    let id = first["data"]["id"].as_i64().expect("id").to_string();
    ok_json(as_user(&w.db, w.supervisor).args(["sos", "resolve", &id]));

    let v = ok_json(as_user(&w.db, w.supervisor).args(["sos", "list"]));
    assert_eq!(v["data"].as_array().map(Vec::len), Some(2));

    let v = ok_json(as_user(&w.db, w.supervisor).args(["sos", "list", "--status", "active"]));
    let rows = v["data"].as_array().expect("array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["user_id"], w.other_id);

    err_json(as_user(&w.db, w.supervisor).args(["sos", "list", "--status", "closed"]), 2);
    err_json(as_user(&w.db, w.exec).args(["sos", "list"]), 4);
}
