//! Booking entity, audit entry and DTOs.

use chrono::NaiveDate;
use hvacdesk_core::booking::{BookingSource, BookingStatus, TimeSlot};
use hvacdesk_core::transition::format_audit_line;
use hvacdesk_core::types::{DbId, Timestamp};
use hvacdesk_core::vocabulary::Priority;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub booking_ref: Uuid,
    pub service_id: DbId,
    pub client_id: Option<DbId>,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub preferred_date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub preferred_time_slot: TimeSlot,
    pub actual_date: Option<NaiveDate>,
    pub message: String,
    pub location_address: String,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    #[sqlx(try_from = "String")]
    pub source: BookingSource,
    pub assigned_technician_id: Option<DbId>,
    pub admin_notes: String,
    pub estimated_cost: Option<Decimal>,
    pub actual_cost: Option<Decimal>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Validated values for a booking insert.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub booking_ref: Uuid,
    pub service_id: DbId,
    pub client_id: Option<DbId>,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub preferred_date: NaiveDate,
    pub preferred_time_slot: TimeSlot,
    pub message: String,
    pub location_address: String,
    pub priority: Priority,
    pub source: BookingSource,
}

/// A row from the `booking_audit_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookingAuditEntry {
    pub id: DbId,
    pub booking_id: DbId,
    #[sqlx(try_from = "String")]
    pub from_status: BookingStatus,
    #[sqlx(try_from = "String")]
    pub to_status: BookingStatus,
    pub actor: String,
    pub note: Option<String>,
    pub created_at: Timestamp,
}

impl BookingAuditEntry {
    pub fn line(&self) -> String {
        format_audit_line(
            self.from_status.as_str(),
            self.to_status.as_str(),
            &self.actor,
            self.note.as_deref(),
        )
    }
}
