//! Repository for the `notification_log` table.

use sqlx::PgPool;

use crate::models::notification_log::{NewNotificationLogEntry, NotificationLogEntry};

const COLUMNS: &str = "id, kind, recipient, subject, delivered, error, created_at";

pub struct NotificationLogRepo;

impl NotificationLogRepo {
    pub async fn insert(
        pool: &PgPool,
        input: &NewNotificationLogEntry,
    ) -> Result<NotificationLogEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO notification_log (kind, recipient, subject, delivered, error) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationLogEntry>(&query)
            .bind(&input.kind)
            .bind(&input.recipient)
            .bind(&input.subject)
            .bind(input.delivered)
            .bind(&input.error)
            .fetch_one(pool)
            .await
    }

    /// Most recent attempts first.
    pub async fn list_recent(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<NotificationLogEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notification_log ORDER BY created_at DESC, id DESC LIMIT $1"
        );
        sqlx::query_as::<_, NotificationLogEntry>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
