//! Handlers for `/admin/clients`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use hvacdesk_core::types::DbId;
use hvacdesk_db::models::client::{Client, CreateClient, UpdateClient};
use hvacdesk_db::repositories::ClientRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireStaff;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflows::clients;

/// POST /api/v1/admin/clients
pub async fn create(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<DataResponse<Client>>)> {
    let client = clients::create_client(&state.pool, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: client })))
}

/// GET /api/v1/admin/clients
pub async fn list(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Client>>>> {
    let (limit, offset) = params.resolve();
    let clients = ClientRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: clients }))
}

/// GET /api/v1/admin/clients/{id}
pub async fn get_by_id(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Client>>> {
    let client = clients::get_client(&state.pool, id).await?;
    Ok(Json(DataResponse { data: client }))
}

/// PUT /api/v1/admin/clients/{id}
pub async fn update(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClient>,
) -> AppResult<Json<DataResponse<Client>>> {
    let client = clients::update_client(&state.pool, id, input).await?;
    Ok(Json(DataResponse { data: client }))
}

/// DELETE /api/v1/admin/clients/{id}
pub async fn delete(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    clients::delete_client(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
