//! Client entity model and DTOs.

use hvacdesk_core::client::{ClientType, ContactMethod};
use hvacdesk_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub client_type: ClientType,
    pub email: String,
    pub phone: String,
    pub alternative_phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub notes: Option<String>,
    #[sqlx(try_from = "String")]
    pub preferred_contact_method: ContactMethod,
    pub total_bookings: i32,
    pub total_spent: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a client from the admin surface.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClient {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub client_type: Option<ClientType>,
    pub alternative_phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub notes: Option<String>,
    pub preferred_contact_method: Option<ContactMethod>,
}

/// DTO for patching a client. `None` leaves a column unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClient {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub client_type: Option<ClientType>,
    pub alternative_phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub notes: Option<String>,
    pub preferred_contact_method: Option<ContactMethod>,
}
