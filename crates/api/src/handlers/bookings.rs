//! Handlers for public booking intake and `/admin/bookings`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use hvacdesk_core::booking::{BookingStatus, TimeSlot};
use hvacdesk_core::types::{short_ref, DbId, Timestamp};
use hvacdesk_db::models::booking::{Booking, BookingAuditEntry};
use serde::Serialize;
use uuid::Uuid;

use super::StatusChangeRequest;
use crate::error::AppResult;
use crate::middleware::rbac::RequireStaff;
use crate::query::StatusListParams;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflows::bookings::{
    self, AssignTechnician, SubmitBooking, UpdateCosts, UpdateNotes,
};

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// What a customer may see about their own booking.
#[derive(Debug, Serialize)]
pub struct PublicBooking {
    pub booking_ref: Uuid,
    /// Short form quoted in e-mails, e.g. `9F1C2B3A`.
    pub reference: String,
    pub status: BookingStatus,
    pub preferred_date: NaiveDate,
    pub preferred_time_slot: TimeSlot,
    pub created_at: Timestamp,
}

impl From<Booking> for PublicBooking {
    fn from(b: Booking) -> Self {
        Self {
            reference: short_ref(&b.booking_ref),
            booking_ref: b.booking_ref,
            status: b.status,
            preferred_date: b.preferred_date,
            preferred_time_slot: b.preferred_time_slot,
            created_at: b.created_at,
        }
    }
}

/// POST /api/v1/bookings
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<SubmitBooking>,
) -> AppResult<(StatusCode, Json<DataResponse<PublicBooking>>)> {
    let booking = bookings::submit_booking(&state, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: booking.into(),
        }),
    ))
}

/// GET /api/v1/bookings/{booking_ref}
pub async fn lookup(
    State(state): State<AppState>,
    Path(booking_ref): Path<Uuid>,
) -> AppResult<Json<DataResponse<PublicBooking>>> {
    let booking = bookings::get_booking_by_ref(&state.pool, booking_ref).await?;
    Ok(Json(DataResponse {
        data: booking.into(),
    }))
}

// ---------------------------------------------------------------------------
// Staff
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/bookings
pub async fn list(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<StatusListParams>,
) -> AppResult<Json<DataResponse<Vec<Booking>>>> {
    let (limit, offset) = params.page();
    let bookings =
        bookings::list_bookings(&state.pool, params.status.as_deref(), limit, offset).await?;
    Ok(Json(DataResponse { data: bookings }))
}

/// GET /api/v1/admin/bookings/{id}
pub async fn get_by_id(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking = bookings::get_booking(&state.pool, id).await?;
    Ok(Json(DataResponse { data: booking }))
}

/// PUT /api/v1/admin/bookings/{id}/status
pub async fn change_status(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StatusChangeRequest>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking = bookings::transition_booking(
        &state,
        id,
        &input.status,
        Some(&user.name),
        input.note.as_deref(),
    )
    .await?;
    Ok(Json(DataResponse { data: booking }))
}

/// PUT /api/v1/admin/bookings/{id}/cost
pub async fn update_cost(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCosts>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking = bookings::update_costs(&state.pool, id, input).await?;
    Ok(Json(DataResponse { data: booking }))
}

/// PUT /api/v1/admin/bookings/{id}/technician
pub async fn assign_technician(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssignTechnician>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking = bookings::assign_technician(&state.pool, id, input).await?;
    Ok(Json(DataResponse { data: booking }))
}

/// PUT /api/v1/admin/bookings/{id}/notes
pub async fn update_notes(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateNotes>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking = bookings::update_notes(&state.pool, id, input).await?;
    Ok(Json(DataResponse { data: booking }))
}

/// Audit entry with its rendered history line.
#[derive(Debug, Serialize)]
pub struct AuditEntryView {
    #[serde(flatten)]
    pub entry: BookingAuditEntry,
    pub line: String,
}

/// GET /api/v1/admin/bookings/{id}/audit
pub async fn audit(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AuditEntryView>>>> {
    let entries = bookings::audit_trail(&state.pool, id)
        .await?
        .into_iter()
        .map(|entry| AuditEntryView {
            line: entry.line(),
            entry,
        })
        .collect();
    Ok(Json(DataResponse { data: entries }))
}
