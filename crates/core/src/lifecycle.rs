//! Typed lifecycle events.
//!
//! Workflows publish these after their transaction commits. Each event
//! carries a snapshot of what a notification needs so consumers never have
//! to reach back into the store.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::booking::{BookingStatus, TimeSlot};
use crate::quotation::LineItem;
use crate::types::{short_ref, DbId};
use crate::vocabulary::Priority;

/// Booking fields rendered into customer messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingSnapshot {
    pub booking_id: DbId,
    pub booking_ref: Uuid,
    pub contact_name: String,
    pub contact_email: String,
    pub service_name: String,
    pub preferred_date: NaiveDate,
    pub preferred_time_slot: TimeSlot,
    pub location_address: String,
}

impl BookingSnapshot {
    pub fn ref8(&self) -> String {
        short_ref(&self.booking_ref)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InquirySnapshot {
    pub inquiry_id: DbId,
    pub inquiry_ref: Uuid,
    pub contact_name: String,
    pub contact_email: String,
    pub subject: String,
    pub message: String,
    pub service_name: Option<String>,
    pub priority: Priority,
}

impl InquirySnapshot {
    pub fn ref8(&self) -> String {
        short_ref(&self.inquiry_ref)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotationSnapshot {
    pub quotation_id: DbId,
    pub quote_number: String,
    pub title: String,
    pub client_name: String,
    pub recipient: String,
    pub items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub total: Decimal,
    pub valid_until: NaiveDate,
    pub payment_terms: String,
}

/// Something happened in a lifecycle that a customer may need to hear about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    BookingReceived {
        booking: BookingSnapshot,
    },
    BookingStatusChanged {
        booking: BookingSnapshot,
        from: BookingStatus,
        to: BookingStatus,
        actor: String,
        note: Option<String>,
    },
    InquiryReceived {
        inquiry: InquirySnapshot,
    },
    QuotationSent {
        quotation: QuotationSnapshot,
    },
}

impl LifecycleEvent {
    /// Dot-separated name used in logs, e.g. `"booking.status_changed"`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BookingReceived { .. } => "booking.received",
            Self::BookingStatusChanged { .. } => "booking.status_changed",
            Self::InquiryReceived { .. } => "inquiry.received",
            Self::QuotationSent { .. } => "quotation.sent",
        }
    }

    /// Address the customer notification goes to.
    pub fn recipient(&self) -> &str {
        match self {
            Self::BookingReceived { booking } | Self::BookingStatusChanged { booking, .. } => {
                &booking.contact_email
            }
            Self::InquiryReceived { inquiry } => &inquiry.contact_email,
            Self::QuotationSent { quotation } => &quotation.recipient,
        }
    }
}
