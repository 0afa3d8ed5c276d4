use crate::core::auth::Session;
use crate::db::{notifications as store, users};
use crate::errors::{AppError, AppResult};
use crate::models::notification::Notification;
use crate::utils::pagination::{Page, PageRequest};
use serde::Serialize;

pub const MIN_PUSH_TOKEN_CHARS: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct Marked {
    pub updated: usize,
}

pub struct NotificationLogic;

impl NotificationLogic {
    pub fn list(s: &Session, unread_only: bool, page: PageRequest) -> AppResult<Page<Notification>> {
        let (rows, total) =
            store::list_for_user(&s.pool.conn, s.caller.id, unread_only, page.limit, page.offset())?;
        Ok(Page::new(rows, total, page))
    }

    pub fn mark_read(s: &mut Session, id: i64) -> AppResult<Marked> {
        let updated = store::mark_read(&s.pool.conn, id, s.caller.id, s.now)?;
        if updated == 0 {
            return Err(AppError::NotFound("Notification not found".into()));
        }
        Ok(Marked { updated })
    }

    pub fn mark_all_read(s: &mut Session) -> AppResult<Marked> {
        let updated = store::mark_all_read(&s.pool.conn, s.caller.id, s.now)?;
        Ok(Marked { updated })
    }

    /// Store the device push token used for outbound notifications.
    pub fn set_push_token(s: &mut Session, token: &str) -> AppResult<()> {
        let token = token.trim();
        if token.chars().count() < MIN_PUSH_TOKEN_CHARS {
            return Err(AppError::validation(format!(
                "Push token must be at least {} characters",
                MIN_PUSH_TOKEN_CHARS
            )));
        }
        users::set_fcm_token(&s.pool.conn, s.caller.id, Some(token))
    }
}
