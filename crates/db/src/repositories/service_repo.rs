//! Repository for the `services` catalog.

use hvacdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::service::{CreateService, Service};

const COLUMNS: &str = "\
    id, name, slug, summary, base_price_min, base_price_max, is_active, created_at, updated_at";

pub struct ServiceRepo;

impl ServiceRepo {
    pub async fn create(pool: &PgPool, input: &CreateService) -> Result<Service, sqlx::Error> {
        let query = format!(
            "INSERT INTO services (name, slug, summary, base_price_min, base_price_max) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.summary)
            .bind(input.base_price_min)
            .bind(input.base_price_max)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services WHERE id = $1");
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Active services, alphabetically.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services WHERE is_active ORDER BY name");
        sqlx::query_as::<_, Service>(&query).fetch_all(pool).await
    }
}
