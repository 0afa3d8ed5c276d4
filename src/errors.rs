//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use serde_json::{Value, json};
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Serialization
    // ---------------------------
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Request errors
    // ---------------------------
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<Value>,
    },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("You are {distance}m away from {zone}. Must be within {required}m to check in.")]
    GeofenceViolation {
        distance: i64,
        required: i64,
        zone: String,
    },

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            details: None,
        }
    }

    pub fn validation_with(message: impl Into<String>, details: Value) -> Self {
        AppError::Validation {
            message: message.into(),
            details: Some(details),
        }
    }

    /// Stable machine-readable kind, part of the error envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation",
            AppError::GeofenceViolation { .. } => "geofence_violation",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::Conflict(_) => "conflict",
            AppError::NotFound(_) => "not_found",
            AppError::Io(_)
            | AppError::Db(_)
            | AppError::Migration(_)
            | AppError::Json(_)
            | AppError::Yaml(_)
            | AppError::Config(_)
            | AppError::Other(_) => "internal",
        }
    }

    /// HTTP-equivalent status of the error.
    pub fn status(&self) -> u16 {
        match self {
            AppError::Validation { .. } | AppError::GeofenceViolation { .. } => 400,
            AppError::Json(_) => 400,
            AppError::Unauthorized(_) => 401,
            AppError::Forbidden(_) => 403,
            AppError::NotFound(_) => 404,
            AppError::Conflict(_) => 409,
            _ => 500,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.status() {
            400 => 2,
            401 => 3,
            403 => 4,
            404 => 5,
            409 => 6,
            _ => 1,
        }
    }

    pub fn details(&self) -> Option<Value> {
        match self {
            AppError::Validation { details, .. } => details.clone(),
            AppError::GeofenceViolation {
                distance, required, ..
            } => Some(json!({ "distance": distance, "required": required })),
            _ => None,
        }
    }

    /// Error envelope: `{success: false, kind, status, error, details?}`.
    pub fn to_envelope(&self) -> Value {
        let mut body = json!({
            "success": false,
            "kind": self.kind(),
            "status": self.status(),
            "error": self.to_string(),
        });
        if let Some(details) = self.details() {
            body["details"] = details;
        }
        body
    }
}
