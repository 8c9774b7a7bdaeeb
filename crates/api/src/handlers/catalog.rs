//! Handlers for the service catalog and the staff roster.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use hvacdesk_core::contact::validate_name;
use hvacdesk_core::error::CoreError;
use hvacdesk_db::models::service::{CreateService, Service};
use hvacdesk_db::models::staff::StaffMember;
use hvacdesk_db::repositories::{ServiceRepo, StaffRepo};

use crate::error::AppResult;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/services
pub async fn list_services(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Service>>>> {
    let services = ServiceRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: services }))
}

/// POST /api/v1/admin/services
pub async fn create_service(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateService>,
) -> AppResult<(StatusCode, Json<DataResponse<Service>>)> {
    let slug = input.slug.trim().to_lowercase();
    if slug.is_empty() || !slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(CoreError::Validation(
            "Slug must be non-empty and contain only letters, digits and dashes".into(),
        )
        .into());
    }
    let input = CreateService {
        name: validate_name(&input.name)?,
        slug,
        ..input
    };
    let service = ServiceRepo::create(&state.pool, &input).await?;
    tracing::info!(service_id = service.id, slug = %service.slug, "Service created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: service })))
}

/// GET /api/v1/admin/staff
pub async fn list_staff(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<StaffMember>>>> {
    let staff = StaffRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: staff }))
}
