//! Notification delivery log model.

use hvacdesk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notification_log` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationLogEntry {
    pub id: DbId,
    pub kind: String,
    pub recipient: String,
    pub subject: String,
    pub delivered: bool,
    pub error: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct NewNotificationLogEntry {
    pub kind: String,
    pub recipient: String,
    pub subject: String,
    pub delivered: bool,
    pub error: Option<String>,
}
