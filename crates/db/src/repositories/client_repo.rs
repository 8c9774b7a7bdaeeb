//! Repository for the `clients` table, including the client directory's
//! resolve-or-create operation.

use hvacdesk_core::types::DbId;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use crate::models::client::{Client, CreateClient, UpdateClient};

/// Column list for `clients` queries.
const COLUMNS: &str = "\
    id, name, client_type, email, phone, alternative_phone, address, city, county, \
    company_name, industry, notes, preferred_contact_method, total_bookings, \
    total_spent, created_at, updated_at";

pub struct ClientRepo;

impl ClientRepo {
    /// Insert a client. A duplicate e-mail violates `uq_clients_email`.
    pub async fn create(pool: &PgPool, input: &CreateClient) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients \
                (name, email, phone, client_type, alternative_phone, address, city, county, \
                 company_name, industry, notes, preferred_contact_method) \
             VALUES ($1, $2, $3, COALESCE($4, 'individual'), $5, $6, $7, $8, $9, $10, $11, \
                     COALESCE($12, 'phone')) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.client_type.map(|t| t.as_str()))
            .bind(&input.alternative_phone)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.county)
            .bind(&input.company_name)
            .bind(&input.industry)
            .bind(&input.notes)
            .bind(input.preferred_contact_method.map(|m| m.as_str()))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Case-insensitive lookup on the matching key.
    pub async fn find_by_email(
        conn: &mut PgConnection,
        email: &str,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, Client>(&query)
            .bind(email)
            .fetch_optional(conn)
            .await
    }

    /// Return the client matching `email`, creating an `individual` client
    /// when none exists. The boolean is `true` when a row was inserted.
    ///
    /// Existing clients are returned unchanged. Concurrent first contacts
    /// with the same address converge on one row through `uq_clients_email`.
    pub async fn resolve_or_create(
        conn: &mut PgConnection,
        email: &str,
        name: &str,
        phone: &str,
    ) -> Result<(Client, bool), sqlx::Error> {
        if let Some(existing) = Self::find_by_email(conn, email).await? {
            return Ok((existing, false));
        }

        let insert = format!(
            "INSERT INTO clients (name, email, phone, client_type) \
             VALUES ($1, $2, $3, 'individual') \
             ON CONFLICT (lower(email)) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Client>(&insert)
            .bind(name)
            .bind(email)
            .bind(phone)
            .fetch_optional(&mut *conn)
            .await?;

        match inserted {
            Some(client) => {
                tracing::info!(client_id = client.id, "Created client from first contact");
                Ok((client, true))
            }
            // Lost the race to a concurrent insert; that row is now visible.
            None => Self::find_by_email(conn, email)
                .await?
                .map(|client| (client, false))
                .ok_or(sqlx::Error::RowNotFound),
        }
    }

    /// List clients newest-first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM clients ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a client. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET \
                name = COALESCE($2, name), \
                email = COALESCE($3, email), \
                phone = COALESCE($4, phone), \
                client_type = COALESCE($5, client_type), \
                alternative_phone = COALESCE($6, alternative_phone), \
                address = COALESCE($7, address), \
                city = COALESCE($8, city), \
                county = COALESCE($9, county), \
                company_name = COALESCE($10, company_name), \
                industry = COALESCE($11, industry), \
                notes = COALESCE($12, notes), \
                preferred_contact_method = COALESCE($13, preferred_contact_method) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.client_type.map(|t| t.as_str()))
            .bind(&input.alternative_phone)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.county)
            .bind(&input.company_name)
            .bind(&input.industry)
            .bind(&input.notes)
            .bind(input.preferred_contact_method.map(|m| m.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Delete a client. Bookings, inquiries and quotations cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fold a completed booking into the client's running totals.
    pub async fn record_completed_booking(
        conn: &mut PgConnection,
        client_id: DbId,
        amount: Decimal,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE clients SET \
                total_bookings = total_bookings + 1, \
                total_spent = total_spent + $2 \
             WHERE id = $1",
        )
        .bind(client_id)
        .bind(amount)
        .execute(conn)
        .await?;
        Ok(())
    }
}
