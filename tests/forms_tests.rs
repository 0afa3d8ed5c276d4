mod common;
use common::{ZONE_LAT, ZONE_LNG, as_user, err_json, ok_json, world};

const TEMPLATE: &str = r#"{
  "activity_id": "sampling",
  "name": "Outlet sampling",
  "fields": [
    {"label": "Outlet name", "field_key": "outlet_name", "field_type": "text", "is_required": true, "sort_order": 1},
    {"label": "Packs sampled", "field_key": "packs_sampled", "field_type": "number", "sort_order": 2}
  ]
}"#;

fn create_template(w: &common::World) -> i64 {
    let v = ok_json(as_user(&w.db, w.manager).args(["forms", "create-template", "--body", TEMPLATE]));
    assert_eq!(v["message"], "Template created");
    v["data"]["id"].as_i64().expect("template id")
}

fn submission_body(template_id: i64, field_id: i64) -> String {
    format!(
        r#"{{"template_id": {template_id}, "activity_id": "sampling", "is_converted": true, "latitude": 19.07, "longitude": 72.87,
            "responses": [{{"field_id": {field_id}, "field_key": "outlet_name", "value_text": "Sai Stores"}}]}}"#
    )
}

#[test]
fn test_template_creation_and_fields() {
    let w = world("forms_templates");
    let id = create_template(&w);
    let id_s = id.to_string();

    let v = ok_json(as_user(&w.db, w.exec).args(["forms", "template", &id_s]));
    let fields = v["data"]["fields"].as_array().expect("fields");
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0]["field_key"], "outlet_name");
    assert_eq!(fields[0]["is_required"], true);
    assert_eq!(v["data"]["requires_gps"], true);

    let v = ok_json(as_user(&w.db, w.manager).args([
        "forms",
        "add-field",
        &id_s,
        "--body",
        r#"{"label": "Shelf photo", "field_key": "shelf_photo", "field_type": "photo", "sort_order": 3}"#,
    ]));
    assert_eq!(v["message"], "Field added");
    assert_eq!(v["data"]["field_type"], "photo");

    let e = err_json(
        as_user(&w.db, w.manager).args([
            "forms",
            "add-field",
            &id_s,
            "--body",
            r#"{"label": "Bad", "field_key": "Bad-Key", "field_type": "text"}"#,
        ]),
        2,
    );
    assert_eq!(e["details"][0]["field"], "field_key");

    err_json(as_user(&w.db, w.supervisor).args(["forms", "create-template", "--body", TEMPLATE]), 4);

    let v = ok_json(as_user(&w.db, w.exec).args(["forms", "templates", "--activity", "sampling"]));
    assert_eq!(v["data"].as_array().map(Vec::len), Some(1));
    let v = ok_json(as_user(&w.db, w.exec).args(["forms", "templates", "--activity", "audit"]));
    assert_eq!(v["data"].as_array().map(Vec::len), Some(0));

    err_json(as_user(&w.db, w.exec).args(["forms", "template", "999"]), 5);
}

#[test]
fn test_submit_requires_mandatory_keys() {
    let w = world("forms_required");
    let id = create_template(&w);

    let body = format!(r#"{{"template_id": {id}, "responses": []}}"#);
    let e = err_json(as_user(&w.db, w.exec).args(["forms", "submit", "--body", &body]), 2);
    assert_eq!(e["error"], "Missing required fields: outlet_name");
    assert_eq!(e["details"]["missing"], serde_json::json!(["outlet_name"]));

    let e = err_json(
        as_user(&w.db, w.exec).args(["forms", "submit", "--body", r#"{"template_id": 999, "responses": []}"#]),
        5,
    );
    assert_eq!(e["error"], "Form template not found");
}

#[test]
fn test_submission_links_attendance_and_respects_visibility() {
    let w = world("forms_submit");
    let id = create_template(&w);
    let v = ok_json(as_user(&w.db, w.exec).args(["forms", "template", &id.to_string()]));
    let field_id = v["data"]["fields"][0]["id"].as_i64().expect("field id");

    // before check-in there is no attendance record to link
    let v = ok_json(as_user(&w.db, w.exec).args(["forms", "submit", "--body", &submission_body(id, field_id)]));
    let early = v["data"]["submission_id"].as_i64().expect("submission id");
    assert_eq!(v["data"]["is_converted"], true);

    let checkin = ok_json(as_user(&w.db, w.exec).args([
        "attendance",
        "checkin",
        "--lat",
        &ZONE_LAT.to_string(),
        "--lng",
        &ZONE_LNG.to_string(),
    ]));
    let attendance_id = checkin["data"]["id"].as_i64().expect("attendance id");

    let v = ok_json(as_user(&w.db, w.exec).args(["forms", "submit", "--body", &submission_body(id, field_id)]));
    assert_eq!(v["message"], "Form submitted successfully");
    let linked = v["data"]["submission_id"].as_i64().expect("submission id").to_string();

    let v = ok_json(as_user(&w.db, w.exec).args(["forms", "submission", &linked]));
    assert_eq!(v["data"]["attendance_id"], attendance_id);
    assert_eq!(v["data"]["responses"][0]["value_text"], "Sai Stores");

    let v = ok_json(as_user(&w.db, w.exec).args(["forms", "submission", &early.to_string()]));
    assert!(v["data"]["attendance_id"].is_null());

    let e = err_json(as_user(&w.db, w.other).args(["forms", "submission", &linked]), 4);
    assert_eq!(e["error"], "Insufficient permissions");
    ok_json(as_user(&w.db, w.supervisor).args(["forms", "submission", &linked]));

    let v = ok_json(as_user(&w.db, w.exec).args(["forms", "submissions", "--date", "2025-03-12"]));
    assert_eq!(v["data"]["pagination"]["total"], 2);

    err_json(as_user(&w.db, w.exec).args(["forms", "all"]), 4);
    let v = ok_json(as_user(&w.db, w.supervisor).args([
        "forms",
        "all",
        "--activity",
        "sampling",
        "--user",
        &w.exec_id.to_string(),
    ]));
    assert_eq!(v["data"]["pagination"]["total"], 2);
    let v = ok_json(as_user(&w.db, w.supervisor).args(["forms", "all", "--user", &w.other_id.to_string()]));
    assert_eq!(v["data"]["pagination"]["total"], 0);
}

#[test]
fn test_submit_rejects_fields_of_other_templates() {
    let w = world("forms_foreign_field");
    let first = create_template(&w);
    let second = create_template(&w);
    let v = ok_json(as_user(&w.db, w.exec).args(["forms", "template", &second.to_string()]));
    let foreign_id = v["data"]["fields"][0]["id"].as_i64().expect("field id");

    // right key, but the field id belongs to another template
    let e = err_json(
        as_user(&w.db, w.exec).args(["forms", "submit", "--body", &submission_body(first, foreign_id)]),
        2,
    );
    assert_eq!(e["error"], "Unknown fields for this template: outlet_name");
    assert_eq!(e["details"]["unknown"], serde_json::json!(["outlet_name"]));

    let v = ok_json(as_user(&w.db, w.exec).args(["forms", "template", &first.to_string()]));
    let field_id = v["data"]["fields"][0]["id"].as_i64().expect("field id");
    let body = format!(
        r#"{{"template_id": {first}, "responses": [
            {{"field_id": {field_id}, "field_key": "outlet_name", "value_text": "Sai Stores"}},
            {{"field_id": {field_id}, "field_key": "mystery", "value_text": "?"}}]}}"#
    );
    let e = err_json(as_user(&w.db, w.exec).args(["forms", "submit", "--body", &body]), 2);
    assert_eq!(e["details"]["unknown"], serde_json::json!(["mystery"]));

    // nothing was stored
    let v = ok_json(as_user(&w.db, w.exec).args(["forms", "submissions"]));
    assert_eq!(v["data"]["pagination"]["total"], 0);
}
