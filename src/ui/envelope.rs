//! JSON response envelopes written by request-handling commands.

use crate::errors::{AppError, AppResult};
use serde::Serialize;
use serde_json::{Value, json};

/// `{"success": true, "data": …, "message"?: …}`
pub fn success_body<T: Serialize>(data: &T, message: Option<&str>) -> AppResult<Value> {
    let mut body = json!({
        "success": true,
        "data": serde_json::to_value(data)?,
    });
    if let Some(m) = message {
        body["message"] = Value::String(m.to_string());
    }
    Ok(body)
}

pub fn ok<T: Serialize>(data: &T) -> AppResult<()> {
    print(&success_body(data, None)?)
}

pub fn ok_with<T: Serialize>(data: &T, message: &str) -> AppResult<()> {
    print(&success_body(data, Some(message))?)
}

/// Envelope for a newly created resource.
pub fn created<T: Serialize>(data: &T, message: &str) -> AppResult<()> {
    ok_with(data, message)
}

/// Error envelope on stderr.
pub fn fail(err: &AppError) {
    match serde_json::to_string_pretty(&err.to_envelope()) {
        Ok(s) => eprintln!("{}", s),
        Err(_) => eprintln!("Error: {}", err),
    }
}

fn print(body: &Value) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(body)?);
    Ok(())
}
