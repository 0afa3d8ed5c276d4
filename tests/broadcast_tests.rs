mod common;
use common::{as_user, err_json, ok_json, world};

const QUESTION: &str = r#"{
  "question": "Which shelf should the new pack go on?",
  "options": [
    {"label": "Eye level", "value": "eye"},
    {"label": "Bottom shelf", "value": "bottom"},
    {"label": "Counter", "value": "counter"}
  ],
  "correct_option": 0,
  "target_roles": ["executive", "supervisor"]
}"#;

fn post_question(w: &common::World, body: &str) -> String {
    let v = ok_json(as_user(&w.db, w.manager).args(["broadcast", "create", "--body", body]));
    assert_eq!(v["message"], "Question posted");
    v["data"]["id"].as_i64().expect("question id").to_string()
}

#[test]
fn test_answer_key_hidden_until_answered() {
    let w = world("bc_answer");
    let id = post_question(&w, QUESTION);

    let v = ok_json(as_user(&w.db, w.exec).args(["broadcast", "list"]));
    let q = &v["data"][0];
    assert!(q["correct_option"].is_null());
    assert_eq!(q["already_answered"], false);
    assert_eq!(q["options"].as_array().map(Vec::len), Some(3));

    let v = ok_json(as_user(&w.db, w.exec).args(["broadcast", "answer", &id, "--option", "1"]));
    assert_eq!(v["data"]["is_correct"], false);
    assert_eq!(v["data"]["correct_option"], 0);
    assert_eq!(v["message"], "Answer submitted");

    let v = ok_json(as_user(&w.db, w.exec).args(["broadcast", "list"]));
    assert_eq!(v["data"][0]["already_answered"], true);
    assert_eq!(v["data"][0]["my_answer"]["selected"], 1);

    let e = err_json(as_user(&w.db, w.exec).args(["broadcast", "answer", &id, "--option", "0"]), 6);
    assert_eq!(e["error"], "Already answered this question");

    let e = err_json(as_user(&w.db, w.other).args(["broadcast", "answer", &id, "--option", "3"]), 2);
    assert_eq!(e["error"], "Invalid option index");

    // city managers are not in the target roles
    let v = ok_json(as_user(&w.db, w.manager).args(["broadcast", "list"]));
    assert_eq!(v["data"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_results_tally_and_close() {
    let w = world("bc_results");
    let id = post_question(&w, QUESTION);

    ok_json(as_user(&w.db, w.exec).args(["broadcast", "answer", &id, "--option", "0"]));
    ok_json(as_user(&w.db, w.other).args(["broadcast", "answer", &id, "--option", "0"]));
    ok_json(as_user(&w.db, w.supervisor).args(["broadcast", "answer", &id, "--option", "2"]));

    err_json(as_user(&w.db, w.supervisor).args(["broadcast", "results", &id]), 4);

    let v = ok_json(as_user(&w.db, w.manager).args(["broadcast", "results", &id]));
    assert_eq!(v["data"]["total_answers"], 3);
    assert_eq!(v["data"]["correct_option"], 0);
    let counts: Vec<i64> = v["data"]["tally"]
        .as_array()
        .expect("tally")
        .iter()
        .map(|t| t["count"].as_i64().expect("count"))
        .collect();
    assert_eq!(counts, vec![2, 0, 1]);

    let v = ok_json(as_user(&w.db, w.manager).args(["broadcast", "close", &id]));
    assert_eq!(v["data"]["status"], "closed");

    let e = err_json(as_user(&w.db, w.manager).args(["broadcast", "answer", &id, "--option", "0"]), 2);
    assert_eq!(e["error"], "Question is no longer active");

    let v = ok_json(as_user(&w.db, w.exec).args(["broadcast", "list"]));
    assert_eq!(v["data"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_question_validation_and_deadline() {
    let w = world("bc_validation");

    err_json(as_user(&w.db, w.exec).args(["broadcast", "create", "--body", QUESTION]), 4);

    let e = err_json(
        as_user(&w.db, w.manager).args([
            "broadcast",
            "create",
            "--body",
            r#"{"question":"Why?","options":[{"label":"A","value":"a"}],"correct_option":4}"#,
        ]),
        2,
    );
    let fields: Vec<&str> = e["details"]
        .as_array()
        .expect("details")
        .iter()
        .filter_map(|d| d["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["question", "options", "correct_option"]);

    let id = post_question(
        &w,
        r#"{
          "question": "Did you attend the morning briefing?",
          "options": [{"label": "Yes", "value": "y"}, {"label": "No", "value": "n"}],
          "deadline_at": "2025-03-12T08:30:00Z"
        }"#,
    );
    let e = err_json(as_user(&w.db, w.exec).args(["broadcast", "answer", &id, "--option", "0"]), 2);
    assert_eq!(e["error"], "Deadline has passed");

    err_json(as_user(&w.db, w.exec).args(["broadcast", "answer", "999", "--option", "0"]), 5);
}
