//! Repository for the `inquiries` table.

use hvacdesk_core::inquiry::InquiryStatus;
use hvacdesk_core::transition::StatusChange;
use hvacdesk_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::inquiry::{Inquiry, NewInquiry};
use crate::models::StatusUpdate;

/// Column list for `inquiries` queries.
const COLUMNS: &str = "\
    id, inquiry_ref, client_id, service_id, contact_name, contact_email, contact_phone, \
    subject, message, budget_range, timeline, status, priority, assigned_to_id, \
    admin_notes, follow_up_date, created_at, updated_at";

pub struct InquiryRepo;

impl InquiryRepo {
    /// Insert an inquiry in status `new`.
    pub async fn create(
        conn: &mut PgConnection,
        input: &NewInquiry,
    ) -> Result<Inquiry, sqlx::Error> {
        let query = format!(
            "INSERT INTO inquiries \
                (inquiry_ref, client_id, service_id, contact_name, contact_email, contact_phone, \
                 subject, message, budget_range, timeline, status, priority) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'new', $11) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(input.inquiry_ref)
            .bind(input.client_id)
            .bind(input.service_id)
            .bind(&input.contact_name)
            .bind(&input.contact_email)
            .bind(&input.contact_phone)
            .bind(&input.subject)
            .bind(&input.message)
            .bind(&input.budget_range)
            .bind(&input.timeline)
            .bind(input.priority.as_str())
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Inquiry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inquiries WHERE id = $1");
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch and row-lock an inquiry inside a transaction.
    pub async fn lock_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Inquiry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inquiries WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List inquiries newest-first, optionally filtered by status.
    pub async fn list(
        pool: &PgPool,
        status: Option<InquiryStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Inquiry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inquiries \
             WHERE ($1::TEXT IS NULL OR status = $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Inquiry>(&query)
            .bind(status.map(|s| s.as_str()))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Compare-and-swap the status from `change.from` to `change.to`.
    pub async fn apply_transition(
        pool: &PgPool,
        id: DbId,
        change: &StatusChange<InquiryStatus>,
    ) -> Result<StatusUpdate<Inquiry>, sqlx::Error> {
        let query = format!(
            "UPDATE inquiries SET status = $3 \
             WHERE id = $1 AND status = $2 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Inquiry>(&query)
            .bind(id)
            .bind(change.from.as_str())
            .bind(change.to.as_str())
            .fetch_optional(pool)
            .await?;
        Ok(match updated {
            Some(inquiry) => StatusUpdate::Applied(inquiry),
            None => StatusUpdate::Stale,
        })
    }

    /// Link an inquiry to the client of its quotation and, when `status` is
    /// given, move it there. An existing client link is kept.
    pub async fn record_quotation(
        conn: &mut PgConnection,
        id: DbId,
        client_id: DbId,
        status: Option<InquiryStatus>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE inquiries \
             SET status = COALESCE($2, status), client_id = COALESCE(client_id, $3) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(status.map(|s| s.as_str()))
        .bind(client_id)
        .execute(conn)
        .await?;
        Ok(())
    }
}
