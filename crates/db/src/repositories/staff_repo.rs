//! Repository for the `staff_members` table.

use hvacdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::staff::{CreateStaffMember, StaffMember};

const COLUMNS: &str = "id, name, email, is_active, created_at, updated_at";

pub struct StaffRepo;

impl StaffRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateStaffMember,
    ) -> Result<StaffMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO staff_members (name, email) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StaffMember>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<StaffMember>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM staff_members WHERE id = $1");
        sqlx::query_as::<_, StaffMember>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Active staff, alphabetically. These are the assignable technicians.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<StaffMember>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM staff_members WHERE is_active ORDER BY name");
        sqlx::query_as::<_, StaffMember>(&query).fetch_all(pool).await
    }
}
