//! Handlers for public inquiry intake and `/admin/inquiries`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use hvacdesk_core::inquiry::InquiryStatus;
use hvacdesk_core::types::{short_ref, DbId};
use hvacdesk_db::models::inquiry::Inquiry;
use hvacdesk_db::models::quotation::Quotation;
use serde::Serialize;
use uuid::Uuid;

use super::StatusChangeRequest;
use crate::error::AppResult;
use crate::middleware::rbac::RequireStaff;
use crate::query::StatusListParams;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflows::inquiries::{self, SubmitInquiry};

/// Acknowledgement returned to the public form.
#[derive(Debug, Serialize)]
pub struct InquiryReceipt {
    pub inquiry_ref: Uuid,
    pub reference: String,
    pub status: InquiryStatus,
}

/// POST /api/v1/inquiries
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<SubmitInquiry>,
) -> AppResult<(StatusCode, Json<DataResponse<InquiryReceipt>>)> {
    let inquiry = inquiries::submit_inquiry(&state, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: InquiryReceipt {
                reference: short_ref(&inquiry.inquiry_ref),
                inquiry_ref: inquiry.inquiry_ref,
                status: inquiry.status,
            },
        }),
    ))
}

/// GET /api/v1/admin/inquiries
pub async fn list(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<StatusListParams>,
) -> AppResult<Json<DataResponse<Vec<Inquiry>>>> {
    let (limit, offset) = params.page();
    let inquiries =
        inquiries::list_inquiries(&state.pool, params.status.as_deref(), limit, offset).await?;
    Ok(Json(DataResponse { data: inquiries }))
}

/// GET /api/v1/admin/inquiries/{id}
pub async fn get_by_id(
    RequireStaff(_user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Inquiry>>> {
    let inquiry = inquiries::get_inquiry(&state.pool, id).await?;
    Ok(Json(DataResponse { data: inquiry }))
}

/// PUT /api/v1/admin/inquiries/{id}/status
pub async fn change_status(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StatusChangeRequest>,
) -> AppResult<Json<DataResponse<Inquiry>>> {
    let inquiry =
        inquiries::transition_inquiry(&state.pool, id, &input.status, Some(&user.name)).await?;
    Ok(Json(DataResponse { data: inquiry }))
}

#[derive(Debug, Serialize)]
pub struct ConversionResponse {
    pub quotation: Quotation,
    pub client_created: bool,
}

/// POST /api/v1/admin/inquiries/{id}/quotation
pub async fn convert(
    RequireStaff(user): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<ConversionResponse>>)> {
    let converted = inquiries::convert_to_quotation(&state.pool, id, &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ConversionResponse {
                quotation: converted.quotation,
                client_created: converted.client_created,
            },
        }),
    ))
}
