//! Quotation entity model and DTOs.

use chrono::NaiveDate;
use hvacdesk_core::error::CoreError;
use hvacdesk_core::quotation::{LineItem, QuotationStatus};
use hvacdesk_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `quotations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quotation {
    pub id: DbId,
    pub quote_number: String,
    pub inquiry_id: Option<DbId>,
    pub client_id: DbId,
    pub title: String,
    pub description: String,
    pub items: Json<Vec<LineItem>>,
    pub subtotal: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub total: Decimal,
    pub terms_and_conditions: String,
    pub valid_until: NaiveDate,
    pub payment_terms: String,
    #[sqlx(try_from = "String")]
    pub status: QuotationStatus,
    pub sent_at: Option<Timestamp>,
    pub viewed_at: Option<Timestamp>,
    pub decided_at: Option<Timestamp>,
    pub created_by_id: Option<DbId>,
    pub notes: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fully priced quotation content. `tax_amount` and `total` are always the
/// output of `compute_pricing` on the other three money fields.
#[derive(Debug, Clone)]
pub struct QuotationContent {
    pub title: String,
    pub description: String,
    pub items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub total: Decimal,
    pub terms_and_conditions: String,
    pub valid_until: NaiveDate,
    pub payment_terms: String,
    pub notes: String,
}

/// Validated values for a quotation insert.
#[derive(Debug, Clone)]
pub struct NewQuotation {
    pub client_id: DbId,
    pub inquiry_id: Option<DbId>,
    pub created_by_id: Option<DbId>,
    pub content: QuotationContent,
}

/// Outcome of drafting a quotation for an inquiry.
#[derive(Debug)]
pub enum Conversion {
    Created {
        quotation: Quotation,
        client_created: bool,
    },
    /// A quotation already references the inquiry.
    AlreadyExists(Quotation),
    /// The inquiry's status does not accept a new quotation.
    Rejected(CoreError),
}
