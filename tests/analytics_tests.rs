mod common;
use chrono::{DateTime, Utc};
use common::{ZONE_LAT, ZONE_LNG, World, as_user, at, err_json, ok_json, world};
use kinematic::core::analytics::{conversion_rate, hourly_buckets};

const TEMPLATE: &str = r#"{
  "activity_id": "sampling",
  "name": "Outlet sampling",
  "fields": [
    {"label": "Outlet name", "field_key": "outlet_name", "field_type": "text", "is_required": true, "sort_order": 1}
  ]
}"#;

fn submit(w: &World, token: &str, now: &str, template: i64, field: i64, converted: bool) {
    let body = format!(
        r#"{{"template_id": {template}, "activity_id": "sampling", "is_converted": {converted}, "outlet_name": "Sai Stores",
            "responses": [{{"field_id": {field}, "field_key": "outlet_name", "value_text": "Sai Stores"}}]}}"#
    );
    ok_json(at(&w.db, token, now).args(["forms", "submit", "--body", &body]));
}

/// A day of field activity: two check-ins (one since checked out), three
/// submissions (one converted), an SOS and a grievance.
fn busy_day(name: &str) -> World {
    let w = world(name);
    let lat = ZONE_LAT.to_string();
    let lng = ZONE_LNG.to_string();

    ok_json(at(&w.db, w.exec, "2025-03-12T09:00:00Z").args(["attendance", "checkin", "--lat", &lat, "--lng", &lng]));
    ok_json(at(&w.db, w.other, "2025-03-12T09:05:00Z").args(["attendance", "checkin", "--lat", &lat, "--lng", &lng]));
    ok_json(at(&w.db, w.other, "2025-03-12T17:00:00Z").args(["attendance", "checkout", "--lat", &lat, "--lng", &lng]));

    let v = ok_json(as_user(&w.db, w.manager).args(["forms", "create-template", "--body", TEMPLATE]));
    let template = v["data"]["id"].as_i64().expect("template id");
    let v = ok_json(as_user(&w.db, w.exec).args(["forms", "template", &template.to_string()]));
    let field = v["data"]["fields"][0]["id"].as_i64().expect("field id");

    submit(&w, w.exec, "2025-03-12T09:30:00Z", template, field, true);
    submit(&w, w.other, "2025-03-12T14:15:00Z", template, field, false);
    submit(&w, w.other, "2025-03-12T22:10:00Z", template, field, false);

    ok_json(at(&w.db, w.exec, "2025-03-12T15:00:00Z").args(["sos", "trigger", "--lat", "19.0", "--lng", "72.8"]));
    ok_json(as_user(&w.db, w.other).args([
        "grievance",
        "submit",
        "--category",
        "payment_salary",
        "--description",
        "Incentives for February have not been paid out yet.",
    ]));
    w
}

#[test]
fn test_summary_counts_the_day() {
    let w = busy_day("analytics_summary");

    let e = err_json(as_user(&w.db, w.exec).args(["analytics", "summary"]), 4);
    assert_eq!(e["kind"], "forbidden");

    let v = ok_json(as_user(&w.db, w.supervisor).args(["analytics", "summary"]));
    let d = &v["data"];
    assert_eq!(d["date"], "2025-03-12");
    assert_eq!(d["executives_checked_in"], 2);
    assert_eq!(d["executives_active"], 1);
    assert_eq!(d["total_executives"], 2);
    assert_eq!(d["total_engagements"], 3);
    assert_eq!(d["total_conversions"], 1);
    assert_eq!(d["conversion_rate"], 33);
    assert_eq!(d["active_sos_alerts"], 1);
    assert_eq!(d["open_grievances"], 1);

    // a quiet day still reports the standing alerts and grievances
    let v = ok_json(as_user(&w.db, w.manager).args(["analytics", "summary", "--date", "2025-03-11"]));
    assert_eq!(v["data"]["executives_checked_in"], 0);
    assert_eq!(v["data"]["total_engagements"], 0);
    assert_eq!(v["data"]["conversion_rate"], 0);
    assert_eq!(v["data"]["active_sos_alerts"], 1);
}

#[test]
fn test_activity_feed_merges_newest_first() {
    let w = busy_day("analytics_feed");

    let v = ok_json(as_user(&w.db, w.supervisor).args(["analytics", "feed"]));
    let feed = v["data"].as_array().expect("feed");
    assert_eq!(feed.len(), 6);
    assert_eq!(feed[0]["type"], "form_submission");
    assert_eq!(feed[0]["description"], "Anita submitted form");
    assert_eq!(feed[1]["type"], "sos");
    assert_eq!(feed[1]["description"], "Ravi raised an SOS alert");
    assert_eq!(feed[1]["status"], "active");
    assert_eq!(feed[3]["description"], "Ravi submitted form ✓ Converted");
    assert_eq!(feed[3]["outlet"], "Sai Stores");
    assert_eq!(feed[4]["type"], "check_in");
    assert_eq!(feed[4]["description"], "Anita checked in at Andheri");
    assert_eq!(feed[5]["description"], "Ravi checked in at Andheri");

    let v = ok_json(as_user(&w.db, w.supervisor).args(["analytics", "feed", "--limit", "2"]));
    assert_eq!(v["data"].as_array().map(Vec::len), Some(2));

    err_json(as_user(&w.db, w.exec).args(["analytics", "feed"]), 4);
}

#[test]
fn test_hourly_keeps_working_hours_and_busy_hours() {
    let w = busy_day("analytics_hourly");

    let v = ok_json(as_user(&w.db, w.manager).args(["analytics", "hourly"]));
    let hours = v["data"].as_array().expect("buckets");
    // 08:00 through 20:00, plus the late submission at 22:00
    assert_eq!(hours.len(), 14);
    assert_eq!(hours[0]["label"], "08:00");
    assert_eq!(hours[1]["hour"], 9);
    assert_eq!(hours[1]["engagements"], 1);
    assert_eq!(hours[1]["conversions"], 1);
    assert_eq!(hours[6]["label"], "14:00");
    assert_eq!(hours[6]["engagements"], 1);
    assert_eq!(hours[6]["conversions"], 0);
    assert_eq!(hours[13]["label"], "22:00");

    err_json(as_user(&w.db, w.exec).args(["analytics", "hourly"]), 4);
}

#[test]
fn test_conversion_rate_rounds_to_whole_percent() {
    assert_eq!(conversion_rate(0, 0), 0);
    assert_eq!(conversion_rate(3, 1), 33);
    assert_eq!(conversion_rate(3, 2), 67);
    assert_eq!(conversion_rate(4, 4), 100);
}

#[test]
fn test_hourly_buckets_on_an_empty_day() {
    let buckets = hourly_buckets(&[]);
    assert_eq!(buckets.len(), 13);
    assert!(buckets.iter().all(|b| b.engagements == 0));

    let early: DateTime<Utc> = "2025-03-12T03:45:00Z".parse().expect("instant");
    let buckets = hourly_buckets(&[(early, true)]);
    assert_eq!(buckets.len(), 14);
    assert_eq!(buckets[0].label, "03:00");
    assert_eq!(buckets[0].conversions, 1);
}
