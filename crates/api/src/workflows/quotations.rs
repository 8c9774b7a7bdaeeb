//! Quotation engine workflows: drafting with server-side pricing, edits
//! while the quote is still open, status changes and sending.

use chrono::{Duration, NaiveDate};
use hvacdesk_core::error::CoreError;
use hvacdesk_core::lifecycle::{LifecycleEvent, QuotationSnapshot};
use hvacdesk_core::quotation::{
    build_line_items, compute_pricing, items_subtotal, validate_pricing, validate_title,
    LineItem, LineItemInput, QuotationStatus, DEFAULT_PAYMENT_TERMS, DEFAULT_TAX_RATE,
    DEFAULT_VALIDITY_DAYS,
};
use hvacdesk_core::transition::plan_transition;
use hvacdesk_core::types::DbId;
use hvacdesk_db::models::quotation::{Conversion, NewQuotation, Quotation, QuotationContent};
use hvacdesk_db::models::StatusUpdate;
use hvacdesk_db::repositories::{ClientRepo, QuotationRepo, StaffRepo};
use hvacdesk_db::DbPool;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::inquiries::already_quoted;
use super::{current_year, today};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Staff-authored quotation. `tax_amount` and `total` are not accepted;
/// they are always derived.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuotationRequest {
    pub client_id: DbId,
    pub inquiry_id: Option<DbId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub items: Vec<LineItemInput>,
    /// Defaults to the sum of the line totals.
    pub subtotal: Option<Decimal>,
    pub tax_rate: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    #[serde(default)]
    pub terms_and_conditions: String,
    pub valid_until: Option<NaiveDate>,
    pub payment_terms: Option<String>,
    #[serde(default)]
    pub notes: String,
}

/// Partial edit. Absent fields keep their stored value; pricing is always
/// recomputed from the merged result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuotationRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub items: Option<Vec<LineItemInput>>,
    pub subtotal: Option<Decimal>,
    pub tax_rate: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub terms_and_conditions: Option<String>,
    pub valid_until: Option<NaiveDate>,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Content assembly
// ---------------------------------------------------------------------------

struct ContentParts {
    title: String,
    description: String,
    items: Vec<LineItem>,
    subtotal: Decimal,
    tax_rate: Decimal,
    discount_amount: Decimal,
    terms_and_conditions: String,
    valid_until: NaiveDate,
    payment_terms: String,
    notes: String,
}

fn finish(parts: ContentParts, today: NaiveDate) -> Result<QuotationContent, CoreError> {
    validate_pricing(
        parts.subtotal,
        parts.tax_rate,
        parts.discount_amount,
        parts.valid_until,
        today,
    )?;
    let pricing = compute_pricing(parts.subtotal, parts.tax_rate, parts.discount_amount)?;
    let payment_terms = match parts.payment_terms.trim() {
        "" => DEFAULT_PAYMENT_TERMS.to_string(),
        terms => terms.to_string(),
    };
    Ok(QuotationContent {
        title: validate_title(&parts.title)?,
        description: parts.description.trim().to_string(),
        items: parts.items,
        subtotal: parts.subtotal,
        tax_rate: parts.tax_rate,
        tax_amount: pricing.tax_amount,
        discount_amount: parts.discount_amount,
        total: pricing.total,
        terms_and_conditions: parts.terms_and_conditions.trim().to_string(),
        valid_until: parts.valid_until,
        payment_terms,
        notes: parts.notes.trim().to_string(),
    })
}

/// Validate a new quotation and derive its pricing.
pub fn build_content(
    input: &CreateQuotationRequest,
    today: NaiveDate,
) -> Result<QuotationContent, CoreError> {
    let items = build_line_items(&input.items)?;
    let subtotal = match input.subtotal {
        Some(subtotal) => subtotal,
        None => items_subtotal(&items)?,
    };
    finish(
        ContentParts {
            title: input.title.clone(),
            description: input.description.clone(),
            subtotal,
            items,
            tax_rate: input.tax_rate.unwrap_or(DEFAULT_TAX_RATE),
            discount_amount: input.discount_amount.unwrap_or(Decimal::ZERO),
            terms_and_conditions: input.terms_and_conditions.clone(),
            valid_until: input
                .valid_until
                .unwrap_or(today + Duration::days(DEFAULT_VALIDITY_DAYS)),
            payment_terms: input.payment_terms.clone().unwrap_or_default(),
            notes: input.notes.clone(),
        },
        today,
    )
}

/// Apply a partial edit on top of the stored quotation and re-derive pricing.
///
/// New line items without an explicit subtotal reset the subtotal to their
/// sum.
pub fn merge_content(
    existing: &Quotation,
    input: UpdateQuotationRequest,
    today: NaiveDate,
) -> Result<QuotationContent, CoreError> {
    let (items, items_sum) = match &input.items {
        Some(raw) => {
            let items = build_line_items(raw)?;
            let sum = items_subtotal(&items)?;
            (items, Some(sum))
        }
        None => (existing.items.0.clone(), None),
    };
    finish(
        ContentParts {
            title: input.title.unwrap_or_else(|| existing.title.clone()),
            description: input
                .description
                .unwrap_or_else(|| existing.description.clone()),
            items,
            subtotal: input.subtotal.or(items_sum).unwrap_or(existing.subtotal),
            tax_rate: input.tax_rate.unwrap_or(existing.tax_rate),
            discount_amount: input.discount_amount.unwrap_or(existing.discount_amount),
            terms_and_conditions: input
                .terms_and_conditions
                .unwrap_or_else(|| existing.terms_and_conditions.clone()),
            valid_until: input.valid_until.unwrap_or(existing.valid_until),
            payment_terms: input
                .payment_terms
                .unwrap_or_else(|| existing.payment_terms.clone()),
            notes: input.notes.unwrap_or_else(|| existing.notes.clone()),
        },
        today,
    )
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// Draft a quotation. When `inquiry_id` is set the inquiry must exist,
/// still be `new` or `in_review` and have no quotation yet.
pub async fn create_quotation(
    pool: &DbPool,
    input: CreateQuotationRequest,
    user: &AuthUser,
) -> AppResult<Quotation> {
    let content = build_content(&input, today())?;

    ClientRepo::find_by_id(pool, input.client_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id: input.client_id,
        }))?;
    let created_by_id = StaffRepo::find_by_id(pool, user.user_id)
        .await?
        .map(|s| s.id);

    let new = NewQuotation {
        client_id: input.client_id,
        inquiry_id: input.inquiry_id,
        created_by_id,
        content,
    };
    let quotation = match input.inquiry_id {
        None => QuotationRepo::create(pool, &new, current_year()).await?,
        Some(inquiry_id) => {
            let outcome =
                QuotationRepo::create_for_inquiry(pool, inquiry_id, &new, current_year())
                    .await?
                    .ok_or(AppError::Core(CoreError::NotFound {
                        entity: "Inquiry",
                        id: inquiry_id,
                    }))?;
            match outcome {
                Conversion::Created { quotation, .. } => quotation,
                Conversion::AlreadyExists(existing) => return Err(already_quoted(existing)),
                Conversion::Rejected(e) => return Err(AppError::Core(e)),
            }
        }
    };

    tracing::info!(
        quotation_id = quotation.id,
        quote_number = %quotation.quote_number,
        total = %quotation.total,
        "Quotation created"
    );
    Ok(quotation)
}

pub async fn get_quotation(pool: &DbPool, id: DbId) -> AppResult<Quotation> {
    QuotationRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Quotation",
            id,
        }))
}

pub async fn list_quotations(
    pool: &DbPool,
    status: Option<&str>,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<Quotation>> {
    let status = status.map(str::parse::<QuotationStatus>).transpose()?;
    Ok(QuotationRepo::list(pool, status, limit, offset).await?)
}

fn locked(quotation: &Quotation) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "Quotation {} is {} and can no longer be edited",
        quotation.quote_number, quotation.status
    )))
}

pub async fn update_quotation(
    pool: &DbPool,
    id: DbId,
    input: UpdateQuotationRequest,
) -> AppResult<Quotation> {
    let existing = get_quotation(pool, id).await?;
    if !existing.status.is_editable() {
        return Err(locked(&existing));
    }
    let content = merge_content(&existing, input, today())?;

    match QuotationRepo::update_content(pool, id, &content).await? {
        StatusUpdate::Applied(updated) => {
            tracing::info!(
                quotation_id = id,
                quote_number = %updated.quote_number,
                total = %updated.total,
                "Quotation updated"
            );
            Ok(updated)
        }
        // Sent between the read and the write.
        StatusUpdate::Stale => Err(locked(&existing)),
    }
}

pub async fn delete_quotation(pool: &DbPool, id: DbId) -> AppResult<()> {
    if QuotationRepo::delete(pool, id).await? {
        tracing::info!(quotation_id = id, "Quotation deleted");
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Quotation",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Move a quotation to `target`. Entering `sent` notifies the client.
pub async fn transition_quotation(
    state: &AppState,
    id: DbId,
    target: &str,
    actor: Option<&str>,
) -> AppResult<Quotation> {
    let current = get_quotation(&state.pool, id).await?;
    let change = plan_transition(current.status, target, actor, None)?;

    let updated = match QuotationRepo::apply_transition(&state.pool, id, &change).await? {
        StatusUpdate::Applied(q) => q,
        StatusUpdate::Stale => {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Quotation {} was changed by someone else, please retry",
                current.quote_number
            ))));
        }
    };

    tracing::info!(
        quotation_id = id,
        quote_number = %updated.quote_number,
        from = %change.from,
        to = %change.to,
        actor = %change.actor,
        "Quotation status changed"
    );

    if change.to == QuotationStatus::Sent {
        publish_sent(state, &updated).await;
    }
    Ok(updated)
}

pub async fn send_quotation(
    state: &AppState,
    id: DbId,
    actor: Option<&str>,
) -> AppResult<Quotation> {
    transition_quotation(state, id, QuotationStatus::Sent.as_str(), actor).await
}

/// Runs after the status change has committed, so failures are logged and
/// never turned into an error response.
async fn publish_sent(state: &AppState, quotation: &Quotation) {
    let client = match ClientRepo::find_by_id(&state.pool, quotation.client_id).await {
        Ok(Some(client)) => client,
        Ok(None) => {
            tracing::warn!(
                quotation_id = quotation.id,
                client_id = quotation.client_id,
                "Client missing, quotation e-mail not sent"
            );
            return;
        }
        Err(e) => {
            tracing::error!(
                quotation_id = quotation.id,
                error = %e,
                "Client lookup failed, quotation e-mail not sent"
            );
            return;
        }
    };

    state.event_bus.publish(LifecycleEvent::QuotationSent {
        quotation: QuotationSnapshot {
            quotation_id: quotation.id,
            quote_number: quotation.quote_number.clone(),
            title: quotation.title.clone(),
            client_name: client.name,
            recipient: client.email,
            items: quotation.items.0.clone(),
            subtotal: quotation.subtotal,
            tax_rate: quotation.tax_rate,
            tax_amount: quotation.tax_amount,
            discount_amount: quotation.discount_amount,
            total: quotation.total,
            valid_until: quotation.valid_until,
            payment_terms: quotation.payment_terms.clone(),
        },
    });
}
