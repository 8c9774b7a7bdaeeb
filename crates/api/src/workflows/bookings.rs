//! Booking lifecycle workflows: public intake, staff transitions and the
//! staff-only bookkeeping fields.

use chrono::NaiveDate;
use hvacdesk_core::booking::{
    validate_cost, validate_message, validate_preferred_date, BookingSource, BookingStatus,
    TimeSlot,
};
use hvacdesk_core::contact::{normalize_phone, validate_email, validate_name};
use hvacdesk_core::error::CoreError;
use hvacdesk_core::lifecycle::{BookingSnapshot, LifecycleEvent};
use hvacdesk_core::transition::plan_transition;
use hvacdesk_core::types::DbId;
use hvacdesk_core::vocabulary::Priority;
use hvacdesk_db::models::booking::{Booking, BookingAuditEntry, NewBooking};
use hvacdesk_db::models::StatusUpdate;
use hvacdesk_db::repositories::{BookingRepo, ServiceRepo, StaffRepo};
use hvacdesk_db::DbPool;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::{clients, today};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Intake
// ---------------------------------------------------------------------------

/// Public booking form.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitBooking {
    pub service_id: DbId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub preferred_date: NaiveDate,
    #[serde(default)]
    pub preferred_time_slot: TimeSlot,
    #[serde(default)]
    pub message: String,
    pub location_address: String,
    #[serde(default)]
    pub source: BookingSource,
}

/// Contact and visit fields after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBooking {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub location_address: String,
}

pub fn validate_submission(
    input: &SubmitBooking,
    today: NaiveDate,
) -> Result<ValidatedBooking, CoreError> {
    let name = validate_name(&input.name)?;
    let email = validate_email(&input.email)?;
    let phone = normalize_phone(&input.phone)?;
    validate_preferred_date(input.preferred_date, today)?;
    let message = input.message.trim().to_string();
    validate_message(&message)?;
    let location_address = input.location_address.trim().to_string();
    if location_address.is_empty() {
        return Err(CoreError::Validation("Location address is required".into()));
    }
    Ok(ValidatedBooking {
        name,
        email,
        phone,
        message,
        location_address,
    })
}

/// Accept a booking from the public form.
///
/// The client is resolved through the directory in the same transaction as
/// the insert; the confirmation notification goes out after commit.
pub async fn submit_booking(state: &AppState, input: SubmitBooking) -> AppResult<Booking> {
    let valid = validate_submission(&input, today())?;

    let service = ServiceRepo::find_by_id(&state.pool, input.service_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Service",
            id: input.service_id,
        }))?;
    if !service.is_active {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Service '{}' is not currently offered",
            service.name
        ))));
    }

    let mut tx = state.pool.begin().await?;
    let (client, client_created) =
        clients::resolve_or_create(&mut tx, &valid.email, &valid.name, &valid.phone).await?;
    let booking = BookingRepo::create(
        &mut tx,
        &NewBooking {
            booking_ref: Uuid::new_v4(),
            service_id: service.id,
            client_id: Some(client.id),
            contact_name: valid.name,
            contact_email: valid.email,
            contact_phone: valid.phone,
            preferred_date: input.preferred_date,
            preferred_time_slot: input.preferred_time_slot,
            message: valid.message,
            location_address: valid.location_address,
            priority: Priority::Normal,
            source: input.source,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        booking_id = booking.id,
        booking_ref = %booking.booking_ref,
        client_id = client.id,
        client_created,
        "Booking received"
    );

    state.event_bus.publish(LifecycleEvent::BookingReceived {
        booking: snapshot(&booking, service.name),
    });
    Ok(booking)
}

fn snapshot(booking: &Booking, service_name: String) -> BookingSnapshot {
    BookingSnapshot {
        booking_id: booking.id,
        booking_ref: booking.booking_ref,
        contact_name: booking.contact_name.clone(),
        contact_email: booking.contact_email.clone(),
        service_name,
        preferred_date: booking.preferred_date,
        preferred_time_slot: booking.preferred_time_slot,
        location_address: booking.location_address.clone(),
    }
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

pub async fn get_booking(pool: &DbPool, id: DbId) -> AppResult<Booking> {
    BookingRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))
}

/// Public lookup by the reference given to the customer. Misses surface as a
/// plain 404 that does not echo the reference back.
pub async fn get_booking_by_ref(pool: &DbPool, booking_ref: Uuid) -> AppResult<Booking> {
    BookingRepo::find_by_ref(pool, booking_ref)
        .await?
        .ok_or(AppError::Database(sqlx::Error::RowNotFound))
}

pub async fn list_bookings(
    pool: &DbPool,
    status: Option<&str>,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<Booking>> {
    let status = status.map(str::parse::<BookingStatus>).transpose()?;
    Ok(BookingRepo::list(pool, status, limit, offset).await?)
}

pub async fn audit_trail(pool: &DbPool, id: DbId) -> AppResult<Vec<BookingAuditEntry>> {
    get_booking(pool, id).await?;
    Ok(BookingRepo::list_audit(pool, id).await?)
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Move a booking to `target`, recording who did it.
///
/// Fails with `InvalidTransition` if the table forbids the move and with
/// `Conflict` if another writer changed the status after it was read. Either
/// way the booking and its audit trail are left untouched.
pub async fn transition_booking(
    state: &AppState,
    id: DbId,
    target: &str,
    actor: Option<&str>,
    note: Option<&str>,
) -> AppResult<Booking> {
    let current = get_booking(&state.pool, id).await?;
    let change = plan_transition(current.status, target, actor, note)?;
    // Loaded before the write so nothing can fail once the change commits.
    let service_name = ServiceRepo::find_by_id(&state.pool, current.service_id)
        .await?
        .map(|s| s.name)
        .unwrap_or_default();

    let updated = match BookingRepo::apply_transition(&state.pool, id, &change).await? {
        StatusUpdate::Applied(booking) => booking,
        StatusUpdate::Stale => {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Booking {id} was changed by someone else, please retry"
            ))));
        }
    };

    tracing::info!(
        booking_id = id,
        from = %change.from,
        to = %change.to,
        actor = %change.actor,
        "Booking status changed"
    );

    state.event_bus.publish(LifecycleEvent::BookingStatusChanged {
        booking: snapshot(&updated, service_name),
        from: change.from,
        to: change.to,
        actor: change.actor,
        note: change.note,
    });
    Ok(updated)
}

// ---------------------------------------------------------------------------
// Staff bookkeeping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCosts {
    pub estimated_cost: Option<Decimal>,
    pub actual_cost: Option<Decimal>,
}

pub async fn update_costs(pool: &DbPool, id: DbId, input: UpdateCosts) -> AppResult<Booking> {
    validate_cost("Estimated cost", input.estimated_cost)?;
    validate_cost("Actual cost", input.actual_cost)?;
    BookingRepo::update_costs(pool, id, input.estimated_cost, input.actual_cost)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignTechnician {
    /// `None` clears the assignment.
    pub technician_id: Option<DbId>,
}

pub async fn assign_technician(
    pool: &DbPool,
    id: DbId,
    input: AssignTechnician,
) -> AppResult<Booking> {
    if let Some(technician_id) = input.technician_id {
        let staff = StaffRepo::find_by_id(pool, technician_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "StaffMember",
                id: technician_id,
            }))?;
        if !staff.is_active {
            return Err(AppError::Core(CoreError::Validation(format!(
                "{} is no longer an active staff member",
                staff.name
            ))));
        }
    }

    let booking = BookingRepo::assign_technician(pool, id, input.technician_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))?;
    tracing::info!(booking_id = id, technician_id = ?input.technician_id, "Technician assigned");
    Ok(booking)
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNotes {
    pub admin_notes: String,
}

pub async fn update_notes(pool: &DbPool, id: DbId, input: UpdateNotes) -> AppResult<Booking> {
    validate_message(&input.admin_notes)?;
    BookingRepo::update_notes(pool, id, input.admin_notes.trim())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))
}
