//! Handlers for `/admin/quotations`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use hvacdesk_core::types::DbId;
use hvacdesk_db::models::quotation::Quotation;

use super::StatusChangeRequest;
use crate::error::AppResult;
use crate::middleware::rbac::RequireStaff;
use crate::query::StatusListParams;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflows::quotations::{self, CreateQuotationRequest, UpdateQuotationRequest};

/// POST /api/v1/admin/quotations
pub async fn create(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateQuotationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Quotation>>)> {
    let quotation = quotations::create_quotation(&state.pool, input, &user).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: quotation })))
}

/// GET /api/v1/admin/quotations
pub async fn list(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<StatusListParams>,
) -> AppResult<Json<DataResponse<Vec<Quotation>>>> {
    let (limit, offset) = params.page();
    let quotations =
        quotations::list_quotations(&state.pool, params.status.as_deref(), limit, offset).await?;
    Ok(Json(DataResponse { data: quotations }))
}

/// GET /api/v1/admin/quotations/{id}
pub async fn get_by_id(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Quotation>>> {
    let quotation = quotations::get_quotation(&state.pool, id).await?;
    Ok(Json(DataResponse { data: quotation }))
}

/// PUT /api/v1/admin/quotations/{id}
pub async fn update(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateQuotationRequest>,
) -> AppResult<Json<DataResponse<Quotation>>> {
    let quotation = quotations::update_quotation(&state.pool, id, input).await?;
    Ok(Json(DataResponse { data: quotation }))
}

/// DELETE /api/v1/admin/quotations/{id}
pub async fn delete(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    quotations::delete_quotation(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/admin/quotations/{id}/status
pub async fn change_status(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StatusChangeRequest>,
) -> AppResult<Json<DataResponse<Quotation>>> {
    let quotation =
        quotations::transition_quotation(&state, id, &input.status, Some(&user.name)).await?;
    Ok(Json(DataResponse { data: quotation }))
}

/// POST /api/v1/admin/quotations/{id}/send
pub async fn send(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Quotation>>> {
    let quotation = quotations::send_quotation(&state, id, Some(&user.name)).await?;
    Ok(Json(DataResponse { data: quotation }))
}
