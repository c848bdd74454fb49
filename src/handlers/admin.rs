use crate::handlers::cron::authorize_trigger;
use crate::helpers::converters::report_to_dto;
use crate::helpers::errors::{schedule_error, HandlerError};
use crate::schemas::{AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
};
use chrono::Utc;
use common::{ApiResponse, RecalculationReportDto};
use tracing::{info, instrument};

/// Recompute the next execution date of every active or paused rule of an owner
///
/// Guarded by the same credentials as the cron trigger.
#[utoipa::path(
    post,
    path = "/api/v1/admin/owners/{owner_id}/recalculate",
    tag = "admin",
    params(
        ("owner_id" = String, Path, description = "Owner ID"),
    ),
    responses(
        (status = 200, description = "Schedules recalculated", body = ApiResponse<RecalculationReportDto>),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, headers))]
pub async fn recalculate_owner(
    Path(owner_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<RecalculationReportDto>>, HandlerError> {
    authorize_trigger(&headers, state.settings.server.cron_secret.as_deref())?;

    let report = state
        .service
        .recalculate_for_owner(&owner_id, Utc::now())
        .await
        .map_err(schedule_error)?;

    info!(
        "Recalculated schedules for owner {}: {} updated",
        owner_id, report.updated
    );
    Ok(Json(ApiResponse {
        data: report_to_dto(owner_id, report),
        message: "Schedules recalculated successfully".to_string(),
        success: true,
    }))
}
