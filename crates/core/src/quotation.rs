//! Quotation engine: status table, numbering, pricing and line items.
//!
//! Pricing invariants, recomputed on every save:
//! - `tax_amount = round(subtotal * tax_rate / 100, 2)`, midpoint away from zero
//! - `total = subtotal + tax_amount - discount_amount`
//!
//! Quote numbers have the form `QT-<year>-<NNNN>`. Allocation of the sequence
//! value is atomic and lives in the persistence layer; this module only
//! formats and parses.

use chrono::{Duration, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::transition::TransitionTable;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

define_vocabulary! {
    /// Quotation status.
    QuotationStatus ("quotation status") {
        Draft = "draft",
        Sent = "sent",
        Viewed = "viewed",
        Accepted = "accepted",
        Rejected = "rejected",
        Expired = "expired",
        Revised = "revised",
    }
}

impl Default for QuotationStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl TransitionTable for QuotationStatus {
    const ENTITY: &'static str = "Quotation";

    fn allowed_transitions(self) -> &'static [Self] {
        use QuotationStatus::*;
        match self {
            Draft => &[Sent],
            Sent => &[Viewed, Accepted, Rejected, Expired, Revised],
            Viewed => &[Accepted, Rejected, Expired, Revised],
            Revised => &[Sent],
            Expired => &[Revised],
            Accepted | Rejected => &[],
        }
    }
}

impl QuotationStatus {
    /// Whether line items and pricing may still be edited.
    pub fn is_editable(self) -> bool {
        matches!(self, Self::Draft | Self::Revised)
    }

    /// Which lifecycle timestamp entering this status stamps.
    pub fn stamps(self) -> Option<QuotationStamp> {
        match self {
            Self::Sent => Some(QuotationStamp::SentAt),
            Self::Viewed => Some(QuotationStamp::ViewedAt),
            Self::Accepted | Self::Rejected => Some(QuotationStamp::DecidedAt),
            _ => None,
        }
    }
}

/// Timestamp column set when a quotation enters a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotationStamp {
    SentAt,
    ViewedAt,
    DecidedAt,
}

impl QuotationStamp {
    pub fn column(self) -> &'static str {
        match self {
            Self::SentAt => "sent_at",
            Self::ViewedAt => "viewed_at",
            Self::DecidedAt => "decided_at",
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default VAT percentage.
pub const DEFAULT_TAX_RATE: Decimal = dec!(16.00);

pub const DEFAULT_VALIDITY_DAYS: i64 = 30;

pub const DEFAULT_PAYMENT_TERMS: &str = "50% deposit, 50% on completion";

pub const MAX_TITLE_LENGTH: usize = 200;

pub const MAX_LINE_ITEMS: usize = 100;

// ---------------------------------------------------------------------------
// Numbering
// ---------------------------------------------------------------------------

pub const QUOTE_NUMBER_PREFIX: &str = "QT";

/// Prefix shared by every quote number issued in `year`, e.g. `QT-2026-`.
pub fn quote_number_prefix(year: i32) -> String {
    format!("{QUOTE_NUMBER_PREFIX}-{year}-")
}

/// Format an allocated sequence value as `QT-<year>-<NNNN>`.
pub fn format_quote_number(year: i32, sequence: i64) -> String {
    format!("{}{sequence:04}", quote_number_prefix(year))
}

/// Extract the sequence value from a quote number issued in `year`.
pub fn parse_quote_sequence(quote_number: &str, year: i32) -> Option<i64> {
    quote_number
        .strip_prefix(&quote_number_prefix(year))
        .filter(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|rest| rest.parse().ok())
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// Derived pricing fields. Never accepted from input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pricing {
    pub tax_amount: Decimal,
    pub total: Decimal,
}

/// Largest amount a money column (`NUMERIC(12,2)`) can hold.
pub const MAX_AMOUNT: Decimal = dec!(9999999999.99);

fn out_of_range(field: &str) -> CoreError {
    CoreError::Validation(format!("{field} exceeds the maximum of {MAX_AMOUNT}"))
}

/// Derive tax and total. Fails instead of overflowing, and when the total
/// would not fit a money column.
pub fn compute_pricing(
    subtotal: Decimal,
    tax_rate: Decimal,
    discount_amount: Decimal,
) -> Result<Pricing, CoreError> {
    let tax_amount = subtotal
        .checked_mul(tax_rate)
        .and_then(|t| t.checked_div(dec!(100)))
        .ok_or_else(|| out_of_range("Tax amount"))?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let total = subtotal
        .checked_add(tax_amount)
        .and_then(|t| t.checked_sub(discount_amount))
        .filter(|t| *t <= MAX_AMOUNT)
        .ok_or_else(|| out_of_range("Total"))?;
    Ok(Pricing { tax_amount, total })
}

/// Caller-level pricing checks, raised before any write.
pub fn validate_pricing(
    subtotal: Decimal,
    tax_rate: Decimal,
    discount_amount: Decimal,
    valid_until: NaiveDate,
    today: NaiveDate,
) -> Result<(), CoreError> {
    if subtotal < Decimal::ZERO {
        return Err(CoreError::Validation("Subtotal cannot be negative".into()));
    }
    if subtotal > MAX_AMOUNT {
        return Err(out_of_range("Subtotal"));
    }
    if tax_rate < Decimal::ZERO || tax_rate > dec!(100) {
        return Err(CoreError::Validation(
            "Tax rate must be between 0 and 100".into(),
        ));
    }
    if discount_amount < Decimal::ZERO {
        return Err(CoreError::Validation(
            "Discount amount cannot be negative".into(),
        ));
    }
    if discount_amount > subtotal {
        return Err(CoreError::Validation(format!(
            "Discount amount ({discount_amount}) cannot exceed subtotal ({subtotal})"
        )));
    }
    if valid_until <= today {
        return Err(CoreError::Validation(
            "Valid until date must be in the future".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Line items
// ---------------------------------------------------------------------------

/// Line item as submitted by staff; the line total is always derived.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LineItemInput {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl LineItem {
    /// Build an item from trusted values, such as the conversion placeholder.
    /// Staff input goes through [`build_line_items`].
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            description: description.into(),
            quantity,
            line_total: (quantity * unit_price).round_dp(2),
            unit_price,
        }
    }
}

/// Validate submitted line items and compute their totals.
pub fn build_line_items(inputs: &[LineItemInput]) -> Result<Vec<LineItem>, CoreError> {
    if inputs.len() > MAX_LINE_ITEMS {
        return Err(CoreError::Validation(format!(
            "A quotation may have at most {MAX_LINE_ITEMS} line items"
        )));
    }
    inputs
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let description = item.description.trim();
            if description.is_empty() {
                return Err(CoreError::Validation(format!(
                    "Line item {} requires a description",
                    i + 1
                )));
            }
            if item.quantity <= Decimal::ZERO {
                return Err(CoreError::Validation(format!(
                    "Line item {} quantity must be greater than zero",
                    i + 1
                )));
            }
            if item.unit_price < Decimal::ZERO {
                return Err(CoreError::Validation(format!(
                    "Line item {} unit price cannot be negative",
                    i + 1
                )));
            }
            if item.quantity > MAX_AMOUNT || item.unit_price > MAX_AMOUNT {
                return Err(out_of_range(&format!("Line item {} value", i + 1)));
            }
            let line_total = item
                .quantity
                .checked_mul(item.unit_price)
                .map(|t| t.round_dp(2))
                .filter(|t| *t <= MAX_AMOUNT)
                .ok_or_else(|| out_of_range(&format!("Line item {} total", i + 1)))?;
            Ok(LineItem {
                description: description.to_string(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                line_total,
            })
        })
        .collect()
}

/// Sum of line totals, bounded like any other money value.
pub fn items_subtotal(items: &[LineItem]) -> Result<Decimal, CoreError> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.line_total))
        .filter(|sum| *sum <= MAX_AMOUNT)
        .ok_or_else(|| out_of_range("Line item subtotal"))
}

pub fn validate_title(title: &str) -> Result<String, CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Title is required".into()));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Inquiry conversion
// ---------------------------------------------------------------------------

/// Field values for a draft created from an inquiry, pending staff edit.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftFromInquiry {
    pub title: String,
    pub description: String,
    pub items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub tax_rate: Decimal,
    pub discount_amount: Decimal,
    pub pricing: Pricing,
    pub valid_until: NaiveDate,
    pub terms_and_conditions: String,
    pub payment_terms: String,
    pub notes: String,
}

/// Build the zero-priced draft for an inquiry.
///
/// `inquiry_ref8` is the short upper-case form of the inquiry reference.
pub fn draft_from_inquiry(
    subject: &str,
    message: &str,
    service_name: Option<&str>,
    inquiry_ref8: &str,
    today: NaiveDate,
) -> DraftFromInquiry {
    let placeholder = format!("{} - Based on inquiry", service_name.unwrap_or("Service"));
    DraftFromInquiry {
        title: format!("Quotation for {subject}"),
        description: message.to_string(),
        items: vec![LineItem::new(placeholder, Decimal::ONE, Decimal::ZERO)],
        subtotal: Decimal::ZERO,
        tax_rate: DEFAULT_TAX_RATE,
        discount_amount: Decimal::ZERO,
        pricing: Pricing {
            tax_amount: Decimal::ZERO,
            total: Decimal::ZERO,
        },
        valid_until: today + Duration::days(DEFAULT_VALIDITY_DAYS),
        terms_and_conditions: "Terms and conditions to be finalized".to_string(),
        payment_terms: DEFAULT_PAYMENT_TERMS.to_string(),
        notes: format!("Created from inquiry {inquiry_ref8}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
