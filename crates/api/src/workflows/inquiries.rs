//! Inquiry intake, staff status changes and conversion into a quotation.

use hvacdesk_core::booking::validate_message;
use hvacdesk_core::contact::{normalize_phone, validate_email, validate_name};
use hvacdesk_core::error::CoreError;
use hvacdesk_core::inquiry::{validate_hint, validate_subject, InquiryStatus};
use hvacdesk_core::lifecycle::{InquirySnapshot, LifecycleEvent};
use hvacdesk_core::transition::plan_transition;
use hvacdesk_core::types::DbId;
use hvacdesk_core::vocabulary::Priority;
use hvacdesk_db::models::inquiry::{Inquiry, NewInquiry};
use hvacdesk_db::models::quotation::{Conversion, Quotation};
use hvacdesk_db::models::StatusUpdate;
use hvacdesk_db::repositories::{InquiryRepo, QuotationRepo, ServiceRepo, StaffRepo};
use hvacdesk_db::DbPool;
use serde::Deserialize;
use uuid::Uuid;

use super::{clean_optional, clients, current_year, today};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Public inquiry form.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitInquiry {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub service_id: Option<DbId>,
    pub budget_range: Option<String>,
    pub timeline: Option<String>,
    #[serde(default)]
    pub priority: Priority,
}

/// Validate the form into the row to insert. The client link is filled in
/// by [`submit_inquiry`] once the contact has been resolved.
pub fn validate_inquiry(input: SubmitInquiry) -> Result<NewInquiry, CoreError> {
    let message = input.message.trim().to_string();
    if message.is_empty() {
        return Err(CoreError::Validation("Message is required".into()));
    }
    validate_message(&message)?;
    let budget_range = clean_optional(input.budget_range);
    let timeline = clean_optional(input.timeline);
    validate_hint("Budget range", budget_range.as_deref())?;
    validate_hint("Timeline", timeline.as_deref())?;

    Ok(NewInquiry {
        inquiry_ref: Uuid::new_v4(),
        client_id: None,
        service_id: input.service_id,
        contact_name: validate_name(&input.name)?,
        contact_email: validate_email(&input.email)?,
        contact_phone: normalize_phone(&input.phone)?,
        subject: validate_subject(&input.subject)?,
        message,
        budget_range,
        timeline,
        priority: input.priority,
    })
}

/// Accept an inquiry from the public form, linking it to the client that
/// owns the contact e-mail (created on first contact).
pub async fn submit_inquiry(state: &AppState, input: SubmitInquiry) -> AppResult<Inquiry> {
    let mut new = validate_inquiry(input)?;

    let service_name = match new.service_id {
        Some(service_id) => Some(
            ServiceRepo::find_by_id(&state.pool, service_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "Service",
                    id: service_id,
                }))?
                .name,
        ),
        None => None,
    };

    let mut tx = state.pool.begin().await?;
    let (client, client_created) = clients::resolve_or_create(
        &mut tx,
        &new.contact_email,
        &new.contact_name,
        &new.contact_phone,
    )
    .await?;
    new.client_id = Some(client.id);
    let inquiry = InquiryRepo::create(&mut tx, &new).await?;
    tx.commit().await?;

    tracing::info!(
        inquiry_id = inquiry.id,
        inquiry_ref = %inquiry.inquiry_ref,
        client_id = client.id,
        client_created,
        priority = %inquiry.priority,
        "Inquiry received"
    );

    state.event_bus.publish(LifecycleEvent::InquiryReceived {
        inquiry: InquirySnapshot {
            inquiry_id: inquiry.id,
            inquiry_ref: inquiry.inquiry_ref,
            contact_name: inquiry.contact_name.clone(),
            contact_email: inquiry.contact_email.clone(),
            subject: inquiry.subject.clone(),
            message: inquiry.message.clone(),
            service_name,
            priority: inquiry.priority,
        },
    });
    Ok(inquiry)
}

pub async fn get_inquiry(pool: &DbPool, id: DbId) -> AppResult<Inquiry> {
    InquiryRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Inquiry",
            id,
        }))
}

pub async fn list_inquiries(
    pool: &DbPool,
    status: Option<&str>,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<Inquiry>> {
    let status = status.map(str::parse::<InquiryStatus>).transpose()?;
    Ok(InquiryRepo::list(pool, status, limit, offset).await?)
}

pub async fn transition_inquiry(
    pool: &DbPool,
    id: DbId,
    target: &str,
    actor: Option<&str>,
) -> AppResult<Inquiry> {
    let current = get_inquiry(pool, id).await?;
    let change = plan_transition(current.status, target, actor, None)?;

    match InquiryRepo::apply_transition(pool, id, &change).await? {
        StatusUpdate::Applied(inquiry) => {
            tracing::info!(
                inquiry_id = id,
                from = %change.from,
                to = %change.to,
                actor = %change.actor,
                "Inquiry status changed"
            );
            Ok(inquiry)
        }
        StatusUpdate::Stale => Err(AppError::Core(CoreError::Conflict(format!(
            "Inquiry {id} was changed by someone else, please retry"
        )))),
    }
}

/// Result of promoting an inquiry.
#[derive(Debug)]
pub struct ConvertedInquiry {
    pub quotation: Quotation,
    pub client_created: bool,
}

/// Draft a quotation from an inquiry.
///
/// A second conversion of the same inquiry fails with `AlreadyExists`
/// carrying the existing quotation's id and number.
pub async fn convert_to_quotation(
    pool: &DbPool,
    inquiry_id: DbId,
    user: &AuthUser,
) -> AppResult<ConvertedInquiry> {
    let created_by_id = StaffRepo::find_by_id(pool, user.user_id)
        .await?
        .map(|s| s.id);

    let conversion =
        QuotationRepo::convert_from_inquiry(pool, inquiry_id, created_by_id, today(), current_year())
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Inquiry",
                id: inquiry_id,
            }))?;

    match conversion {
        Conversion::Created {
            quotation,
            client_created,
        } => {
            tracing::info!(
                inquiry_id,
                quotation_id = quotation.id,
                quote_number = %quotation.quote_number,
                client_created,
                "Inquiry converted to draft quotation"
            );
            Ok(ConvertedInquiry {
                quotation,
                client_created,
            })
        }
        Conversion::AlreadyExists(existing) => Err(already_quoted(existing)),
        Conversion::Rejected(e) => Err(AppError::Core(e)),
    }
}

/// Error pointing at the quotation that already covers an inquiry.
pub(crate) fn already_quoted(existing: Quotation) -> AppError {
    AppError::Core(CoreError::AlreadyExists {
        entity: "Quotation",
        id: existing.id,
        reference: existing.quote_number,
    })
}
