//! Inquiry entity model and DTOs.

use chrono::NaiveDate;
use hvacdesk_core::inquiry::InquiryStatus;
use hvacdesk_core::types::{DbId, Timestamp};
use hvacdesk_core::vocabulary::Priority;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `inquiries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Inquiry {
    pub id: DbId,
    pub inquiry_ref: Uuid,
    pub client_id: Option<DbId>,
    pub service_id: Option<DbId>,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub subject: String,
    pub message: String,
    pub budget_range: Option<String>,
    pub timeline: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: InquiryStatus,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    pub assigned_to_id: Option<DbId>,
    pub admin_notes: String,
    pub follow_up_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Validated values for an inquiry insert.
#[derive(Debug, Clone)]
pub struct NewInquiry {
    pub inquiry_ref: Uuid,
    pub client_id: Option<DbId>,
    pub service_id: Option<DbId>,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub subject: String,
    pub message: String,
    pub budget_range: Option<String>,
    pub timeline: Option<String>,
    pub priority: Priority,
}
