//! Repository for `bookings` and their append-only audit trail.

use hvacdesk_core::booking::BookingStatus;
use hvacdesk_core::transition::StatusChange;
use hvacdesk_core::types::DbId;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::booking::{Booking, BookingAuditEntry, NewBooking};
use crate::models::StatusUpdate;
use crate::repositories::ClientRepo;

/// Column list for `bookings` queries.
const COLUMNS: &str = "\
    id, booking_ref, service_id, client_id, contact_name, contact_email, contact_phone, \
    preferred_date, preferred_time_slot, actual_date, message, location_address, status, \
    priority, source, assigned_technician_id, admin_notes, estimated_cost, actual_cost, \
    created_at, updated_at";

const AUDIT_COLUMNS: &str = "id, booking_id, from_status, to_status, actor, note, created_at";

pub struct BookingRepo;

impl BookingRepo {
    /// Insert a booking in status `new`.
    pub async fn create(
        conn: &mut PgConnection,
        input: &NewBooking,
    ) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings \
                (booking_ref, service_id, client_id, contact_name, contact_email, contact_phone, \
                 preferred_date, preferred_time_slot, message, location_address, status, \
                 priority, source) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'new', $11, $12) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(input.booking_ref)
            .bind(input.service_id)
            .bind(input.client_id)
            .bind(&input.contact_name)
            .bind(&input.contact_email)
            .bind(&input.contact_phone)
            .bind(input.preferred_date)
            .bind(input.preferred_time_slot.as_str())
            .bind(&input.message)
            .bind(&input.location_address)
            .bind(input.priority.as_str())
            .bind(input.source.as_str())
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_ref(pool: &PgPool, booking_ref: Uuid) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE booking_ref = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(booking_ref)
            .fetch_optional(pool)
            .await
    }

    /// List bookings newest-first, optionally filtered by status.
    pub async fn list(
        pool: &PgPool,
        status: Option<BookingStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings \
             WHERE ($1::TEXT IS NULL OR status = $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(status.map(|s| s.as_str()))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Apply a planned status change.
    ///
    /// In one transaction: swap the status only if it still equals
    /// `change.from`, append the audit entry, and on completion fold the
    /// actual cost into the linked client's totals. Returns
    /// [`StatusUpdate::Stale`] without writing anything if the booking has
    /// moved on since it was read.
    pub async fn apply_transition(
        pool: &PgPool,
        id: DbId,
        change: &StatusChange<BookingStatus>,
    ) -> Result<StatusUpdate<Booking>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE bookings SET status = $3 \
             WHERE id = $1 AND status = $2 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(change.from.as_str())
            .bind(change.to.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(booking) = updated else {
            return Ok(StatusUpdate::Stale);
        };

        Self::append_audit(&mut tx, id, change).await?;

        if change.to == BookingStatus::Completed {
            if let Some(client_id) = booking.client_id {
                let amount = booking.actual_cost.unwrap_or(Decimal::ZERO);
                ClientRepo::record_completed_booking(&mut tx, client_id, amount).await?;
            }
        }

        tx.commit().await?;
        Ok(StatusUpdate::Applied(booking))
    }

    async fn append_audit(
        conn: &mut PgConnection,
        booking_id: DbId,
        change: &StatusChange<BookingStatus>,
    ) -> Result<BookingAuditEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO booking_audit_entries (booking_id, from_status, to_status, actor, note) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {AUDIT_COLUMNS}"
        );
        sqlx::query_as::<_, BookingAuditEntry>(&query)
            .bind(booking_id)
            .bind(change.from.as_str())
            .bind(change.to.as_str())
            .bind(&change.actor)
            .bind(&change.note)
            .fetch_one(conn)
            .await
    }

    /// Audit trail for a booking in the order it was written.
    pub async fn list_audit(
        pool: &PgPool,
        booking_id: DbId,
    ) -> Result<Vec<BookingAuditEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {AUDIT_COLUMNS} FROM booking_audit_entries \
             WHERE booking_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, BookingAuditEntry>(&query)
            .bind(booking_id)
            .fetch_all(pool)
            .await
    }

    /// Replace both cost fields.
    pub async fn update_costs(
        pool: &PgPool,
        id: DbId,
        estimated_cost: Option<Decimal>,
        actual_cost: Option<Decimal>,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings SET estimated_cost = $2, actual_cost = $3 \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(estimated_cost)
            .bind(actual_cost)
            .fetch_optional(pool)
            .await
    }

    /// Set or clear the assigned technician.
    pub async fn assign_technician(
        pool: &PgPool,
        id: DbId,
        technician_id: Option<DbId>,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings SET assigned_technician_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(technician_id)
            .fetch_optional(pool)
            .await
    }

    /// Replace the free-text staff notes. The audit trail is unaffected.
    pub async fn update_notes(
        pool: &PgPool,
        id: DbId,
        admin_notes: &str,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("UPDATE bookings SET admin_notes = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(admin_notes)
            .fetch_optional(pool)
            .await
    }
}
