//! Service catalog model and DTOs.

use hvacdesk_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `services` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Service {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub summary: String,
    pub base_price_min: Option<Decimal>,
    pub base_price_max: Option<Decimal>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateService {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub summary: String,
    pub base_price_min: Option<Decimal>,
    pub base_price_max: Option<Decimal>,
}
