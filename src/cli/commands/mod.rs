pub mod analytics;
pub mod attendance;
pub mod auth;
pub mod broadcast;
pub mod config;
pub mod db;
pub mod forms;
pub mod grievance;
pub mod init;
pub mod leaderboard;
pub mod learning;
pub mod log;
pub mod notify;
pub mod provision;
pub mod sos;
pub mod stock;
pub mod upload;
pub mod users;
pub mod visits;
pub mod zones;

use crate::config::Config;
use crate::core::auth::{Session, StoreIdentity, open_session};
use crate::core::storage::FsStorage;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::utils::pagination::PageRequest;
use crate::utils::path::expand_tilde;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::fs;

/// Per-invocation state shared by the request-handling commands.
pub struct Context<'a> {
    pub cfg: &'a Config,
    pub token: Option<&'a str>,
    pub now: DateTime<Utc>,
    pub storage_dir: String,
}

impl Context<'_> {
    pub fn pool(&self) -> AppResult<DbPool> {
        DbPool::new(&self.cfg.database)
    }

    /// Open the database and authenticate the caller.
    pub fn session(&self) -> AppResult<Session> {
        open_session(self.pool()?, &StoreIdentity, self.token, self.now)
    }

    pub fn storage(&self) -> FsStorage {
        FsStorage::new(expand_tilde(&self.storage_dir))
    }

    pub fn page(&self, page: Option<u32>, limit: Option<u32>) -> PageRequest {
        PageRequest::new(page, limit, self.cfg.page_size, self.cfg.max_page_size)
    }
}

/// Parse a `--body` argument: inline JSON, or `@path` to read it from a file.
pub fn read_body<T: DeserializeOwned>(raw: &str) -> AppResult<T> {
    let text = match raw.strip_prefix('@') {
        Some(path) => fs::read_to_string(expand_tilde(path))
            .map_err(|e| AppError::validation(format!("cannot read body file {}: {}", path, e)))?,
        None => raw.to_string(),
    };
    serde_json::from_str(&text).map_err(|e| AppError::validation(format!("Invalid JSON body: {}", e)))
}
