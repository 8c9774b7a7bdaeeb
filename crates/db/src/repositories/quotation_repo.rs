//! Repository for `quotations`, including atomic quote-number allocation
//! and inquiry conversion.

use chrono::NaiveDate;
use hvacdesk_core::inquiry::{status_on_quotation, InquiryStatus, QuotationOrigin};
use hvacdesk_core::quotation::{
    draft_from_inquiry, format_quote_number, quote_number_prefix, QuotationStatus,
};
use hvacdesk_core::transition::StatusChange;
use hvacdesk_core::types::{short_ref, DbId};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use crate::models::inquiry::Inquiry;
use crate::models::quotation::{Conversion, NewQuotation, Quotation, QuotationContent};
use crate::models::StatusUpdate;
use crate::repositories::{ClientRepo, InquiryRepo};

/// Column list for `quotations` queries.
const COLUMNS: &str = "\
    id, quote_number, inquiry_id, client_id, title, description, items, subtotal, tax_rate, \
    tax_amount, discount_amount, total, terms_and_conditions, valid_until, payment_terms, \
    status, sent_at, viewed_at, decided_at, created_by_id, notes, created_at, updated_at";

pub struct QuotationRepo;

/// A locked inquiry that may receive a quotation.
struct Claim {
    inquiry: Inquiry,
    next_status: Option<InquiryStatus>,
}

impl QuotationRepo {
    /// Reserve the next quote number for `year`.
    ///
    /// The per-year counter row is created on first use, seeded from the
    /// highest number already issued that year, and incremented atomically
    /// afterwards. Must run inside the transaction that inserts the
    /// quotation so an aborted insert does not burn a number.
    pub async fn allocate_number(conn: &mut PgConnection, year: i32) -> Result<String, sqlx::Error> {
        let (sequence,): (i64,) = sqlx::query_as(
            "INSERT INTO quote_number_sequences (year, last_value) \
             VALUES ($1, COALESCE(( \
                 SELECT MAX(CAST(substring(quote_number FROM '^QT-[0-9]+-([0-9]+)$') AS BIGINT)) \
                 FROM quotations WHERE quote_number LIKE $2 \
             ), 0) + 1) \
             ON CONFLICT (year) DO UPDATE \
                SET last_value = quote_number_sequences.last_value + 1 \
             RETURNING last_value",
        )
        .bind(year)
        .bind(format!("{}%", quote_number_prefix(year)))
        .fetch_one(conn)
        .await?;
        Ok(format_quote_number(year, sequence))
    }

    async fn insert(
        conn: &mut PgConnection,
        quote_number: &str,
        input: &NewQuotation,
    ) -> Result<Quotation, sqlx::Error> {
        let c = &input.content;
        let query = format!(
            "INSERT INTO quotations \
                (quote_number, inquiry_id, client_id, title, description, items, subtotal, \
                 tax_rate, tax_amount, discount_amount, total, terms_and_conditions, \
                 valid_until, payment_terms, status, created_by_id, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, 'draft', $15, $16) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quotation>(&query)
            .bind(quote_number)
            .bind(input.inquiry_id)
            .bind(input.client_id)
            .bind(&c.title)
            .bind(&c.description)
            .bind(Json(&c.items))
            .bind(c.subtotal)
            .bind(c.tax_rate)
            .bind(c.tax_amount)
            .bind(c.discount_amount)
            .bind(c.total)
            .bind(&c.terms_and_conditions)
            .bind(c.valid_until)
            .bind(&c.payment_terms)
            .bind(input.created_by_id)
            .bind(&c.notes)
            .fetch_one(conn)
            .await
    }

    /// Insert a draft quotation with a freshly allocated number.
    pub async fn create(
        pool: &PgPool,
        input: &NewQuotation,
        year: i32,
    ) -> Result<Quotation, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let quote_number = Self::allocate_number(&mut tx, year).await?;
        let quotation = Self::insert(&mut tx, &quote_number, input).await?;
        tx.commit().await?;
        Ok(quotation)
    }

    /// Insert a staff-authored draft attached to `inquiry_id`.
    ///
    /// Holds the inquiry's row lock for the whole transaction. Returns
    /// `None` if the inquiry does not exist; an inquiry that already has a
    /// quotation or is past review is reported through [`Conversion`].
    pub async fn create_for_inquiry(
        pool: &PgPool,
        inquiry_id: DbId,
        input: &NewQuotation,
        year: i32,
    ) -> Result<Option<Conversion>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let claim = match Self::claim_inquiry(&mut tx, inquiry_id, QuotationOrigin::Manual).await? {
            None => return Ok(None),
            Some(Err(blocked)) => return Ok(Some(blocked)),
            Some(Ok(claim)) => claim,
        };

        let input = NewQuotation {
            inquiry_id: Some(inquiry_id),
            ..input.clone()
        };
        let quote_number = Self::allocate_number(&mut tx, year).await?;
        let quotation = Self::insert(&mut tx, &quote_number, &input).await?;
        InquiryRepo::record_quotation(&mut tx, inquiry_id, input.client_id, claim.next_status)
            .await?;

        tx.commit().await?;
        Ok(Some(Conversion::Created {
            quotation,
            client_created: false,
        }))
    }

    /// Lock an inquiry and check that it can take a new quotation.
    async fn claim_inquiry(
        conn: &mut PgConnection,
        inquiry_id: DbId,
        origin: QuotationOrigin,
    ) -> Result<Option<Result<Claim, Conversion>>, sqlx::Error> {
        let Some(inquiry) = InquiryRepo::lock_by_id(conn, inquiry_id).await? else {
            return Ok(None);
        };
        if let Some(existing) = Self::find_by_inquiry(conn, inquiry_id).await? {
            return Ok(Some(Err(Conversion::AlreadyExists(existing))));
        }
        Ok(Some(match status_on_quotation(inquiry.status, origin) {
            Ok(next_status) => Ok(Claim {
                inquiry,
                next_status,
            }),
            Err(e) => Err(Conversion::Rejected(e)),
        }))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Quotation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quotations WHERE id = $1");
        sqlx::query_as::<_, Quotation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The first quotation created for an inquiry, if any.
    pub async fn find_by_inquiry(
        conn: &mut PgConnection,
        inquiry_id: DbId,
    ) -> Result<Option<Quotation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quotations WHERE inquiry_id = $1 ORDER BY id LIMIT 1"
        );
        sqlx::query_as::<_, Quotation>(&query)
            .bind(inquiry_id)
            .fetch_optional(conn)
            .await
    }

    /// List quotations newest-first, optionally filtered by status.
    pub async fn list(
        pool: &PgPool,
        status: Option<QuotationStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Quotation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quotations \
             WHERE ($1::TEXT IS NULL OR status = $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Quotation>(&query)
            .bind(status.map(|s| s.as_str()))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Overwrite the editable content of a quotation still in `draft` or
    /// `revised`. The quote number never changes.
    pub async fn update_content(
        pool: &PgPool,
        id: DbId,
        content: &QuotationContent,
    ) -> Result<StatusUpdate<Quotation>, sqlx::Error> {
        let query = format!(
            "UPDATE quotations SET \
                title = $2, description = $3, items = $4, subtotal = $5, tax_rate = $6, \
                tax_amount = $7, discount_amount = $8, total = $9, \
                terms_and_conditions = $10, valid_until = $11, payment_terms = $12, notes = $13 \
             WHERE id = $1 AND status IN ('draft', 'revised') \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Quotation>(&query)
            .bind(id)
            .bind(&content.title)
            .bind(&content.description)
            .bind(Json(&content.items))
            .bind(content.subtotal)
            .bind(content.tax_rate)
            .bind(content.tax_amount)
            .bind(content.discount_amount)
            .bind(content.total)
            .bind(&content.terms_and_conditions)
            .bind(content.valid_until)
            .bind(&content.payment_terms)
            .bind(&content.notes)
            .fetch_optional(pool)
            .await?;
        Ok(match updated {
            Some(q) => StatusUpdate::Applied(q),
            None => StatusUpdate::Stale,
        })
    }

    /// Compare-and-swap the status, stamping the matching lifecycle
    /// timestamp (`sent_at`, `viewed_at` or `decided_at`).
    pub async fn apply_transition(
        pool: &PgPool,
        id: DbId,
        change: &StatusChange<QuotationStatus>,
    ) -> Result<StatusUpdate<Quotation>, sqlx::Error> {
        let stamp = change
            .to
            .stamps()
            .map(|s| format!(", {} = NOW()", s.column()))
            .unwrap_or_default();
        let query = format!(
            "UPDATE quotations SET status = $3{stamp} \
             WHERE id = $1 AND status = $2 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Quotation>(&query)
            .bind(id)
            .bind(change.from.as_str())
            .bind(change.to.as_str())
            .fetch_optional(pool)
            .await?;
        Ok(match updated {
            Some(q) => StatusUpdate::Applied(q),
            None => StatusUpdate::Stale,
        })
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quotations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Promote an inquiry into a zero-priced draft quotation.
    ///
    /// Runs in one transaction holding a row lock on the inquiry, so two
    /// concurrent conversions cannot both pass the existence check. A `new`
    /// inquiry moves to `in_review`; closed or converted inquiries are
    /// rejected. Returns `None` if the inquiry does not exist.
    pub async fn convert_from_inquiry(
        pool: &PgPool,
        inquiry_id: DbId,
        created_by_id: Option<DbId>,
        today: NaiveDate,
        year: i32,
    ) -> Result<Option<Conversion>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let Claim {
            inquiry,
            next_status,
        } = match Self::claim_inquiry(&mut tx, inquiry_id, QuotationOrigin::Conversion).await? {
            None => return Ok(None),
            Some(Err(blocked)) => return Ok(Some(blocked)),
            Some(Ok(claim)) => claim,
        };

        let (client, client_created) = ClientRepo::resolve_or_create(
            &mut tx,
            &inquiry.contact_email,
            &inquiry.contact_name,
            &inquiry.contact_phone,
        )
        .await?;

        let service_name: Option<String> = match inquiry.service_id {
            Some(service_id) => {
                sqlx::query_scalar("SELECT name FROM services WHERE id = $1")
                    .bind(service_id)
                    .fetch_optional(&mut *tx)
                    .await?
            }
            None => None,
        };

        let draft = draft_from_inquiry(
            &inquiry.subject,
            &inquiry.message,
            service_name.as_deref(),
            &short_ref(&inquiry.inquiry_ref),
            today,
        );
        let input = NewQuotation {
            client_id: client.id,
            inquiry_id: Some(inquiry.id),
            created_by_id,
            content: QuotationContent {
                title: draft.title,
                description: draft.description,
                items: draft.items,
                subtotal: draft.subtotal,
                tax_rate: draft.tax_rate,
                tax_amount: draft.pricing.tax_amount,
                discount_amount: draft.discount_amount,
                total: draft.pricing.total,
                terms_and_conditions: draft.terms_and_conditions,
                valid_until: draft.valid_until,
                payment_terms: draft.payment_terms,
                notes: draft.notes,
            },
        };

        let quote_number = Self::allocate_number(&mut tx, year).await?;
        let quotation = Self::insert(&mut tx, &quote_number, &input).await?;
        InquiryRepo::record_quotation(&mut tx, inquiry.id, client.id, next_status).await?;

        tx.commit().await?;
        Ok(Some(Conversion::Created {
            quotation,
            client_created,
        }))
    }
}
