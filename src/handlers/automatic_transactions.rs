use crate::helpers::converters::{
    new_rule_from_request, occurrence_to_dto, rule_to_dto, rule_update_from_request,
};
use crate::helpers::errors::{schedule_error, HandlerError};
use crate::schemas::{AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{NaiveDate, Utc};
use common::{
    ApiResponse, AutomaticTransactionDto, CreateAutomaticTransactionRequest, OccurrenceDto,
    PreviewQuery, UpdateAutomaticTransactionRequest,
};
use serde::Deserialize;
use tracing::{debug, info, instrument, trace};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

const DEFAULT_PREVIEW_COUNT: usize = 12;

/// Query parameters for listing automatic transactions
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct OwnerQuery {
    /// Owner whose rules are listed
    #[validate(length(min = 1))]
    pub owner_id: String,
}

/// Create a new automatic transaction
#[utoipa::path(
    post,
    path = "/api/v1/automatic-transactions",
    tag = "automatic-transactions",
    request_body = CreateAutomaticTransactionRequest,
    responses(
        (status = 201, description = "Automatic transaction created successfully", body = ApiResponse<AutomaticTransactionDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_automatic_transaction(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateAutomaticTransactionRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<AutomaticTransactionDto>>), HandlerError> {
    trace!("Entering create_automatic_transaction function");
    debug!(
        "Creating {:?} automatic transaction for owner {}",
        request.recurrence_type, request.owner_id
    );

    let rule = state
        .service
        .create(new_rule_from_request(request), Utc::now())
        .await
        .map_err(schedule_error)?;

    info!(
        "Automatic transaction created with ID: {}, next execution: {}",
        rule.id, rule.next_execution_date
    );
    let response = ApiResponse {
        data: rule_to_dto(rule),
        message: "Automatic transaction created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// List the automatic transactions of an owner
#[utoipa::path(
    get,
    path = "/api/v1/automatic-transactions",
    tag = "automatic-transactions",
    params(OwnerQuery),
    responses(
        (status = 200, description = "Automatic transactions retrieved successfully", body = ApiResponse<Vec<AutomaticTransactionDto>>),
        (status = 400, description = "Missing owner", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_automatic_transactions(
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<OwnerQuery>>,
) -> Result<Json<ApiResponse<Vec<AutomaticTransactionDto>>>, HandlerError> {
    trace!("Entering get_automatic_transactions function");

    let rules = state
        .service
        .list_for_owner(&query.owner_id)
        .await
        .map_err(schedule_error)?;

    debug!("Retrieved {} automatic transactions", rules.len());
    let response = ApiResponse {
        data: rules.into_iter().map(rule_to_dto).collect(),
        message: "Automatic transactions retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific automatic transaction by ID
#[utoipa::path(
    get,
    path = "/api/v1/automatic-transactions/{id}",
    tag = "automatic-transactions",
    params(
        ("id" = i32, Path, description = "Automatic transaction ID"),
    ),
    responses(
        (status = 200, description = "Automatic transaction retrieved successfully", body = ApiResponse<AutomaticTransactionDto>),
        (status = 404, description = "Automatic transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_automatic_transaction(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AutomaticTransactionDto>>, HandlerError> {
    trace!("Entering get_automatic_transaction function for id: {}", id);

    let rule = state.service.get(id).await.map_err(schedule_error)?;

    let response = ApiResponse {
        data: rule_to_dto(rule),
        message: "Automatic transaction retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update an automatic transaction
///
/// Changing the recurrence or the start date recomputes the next execution date.
#[utoipa::path(
    put,
    path = "/api/v1/automatic-transactions/{id}",
    tag = "automatic-transactions",
    params(
        ("id" = i32, Path, description = "Automatic transaction ID"),
    ),
    request_body = UpdateAutomaticTransactionRequest,
    responses(
        (status = 200, description = "Automatic transaction updated successfully", body = ApiResponse<AutomaticTransactionDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Automatic transaction not found", body = ErrorResponse),
        (status = 409, description = "Automatic transaction is cancelled or completed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_automatic_transaction(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateAutomaticTransactionRequest>>,
) -> Result<Json<ApiResponse<AutomaticTransactionDto>>, HandlerError> {
    trace!("Entering update_automatic_transaction function for id: {}", id);

    let rule = state
        .service
        .update(id, rule_update_from_request(request), Utc::now())
        .await
        .map_err(schedule_error)?;

    info!("Automatic transaction {} updated", rule.id);
    let response = ApiResponse {
        data: rule_to_dto(rule),
        message: "Automatic transaction updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Cancel an automatic transaction (soft delete)
#[utoipa::path(
    post,
    path = "/api/v1/automatic-transactions/{id}/cancel",
    tag = "automatic-transactions",
    params(
        ("id" = i32, Path, description = "Automatic transaction ID"),
    ),
    responses(
        (status = 200, description = "Automatic transaction cancelled", body = ApiResponse<AutomaticTransactionDto>),
        (status = 404, description = "Automatic transaction not found", body = ErrorResponse),
        (status = 409, description = "Automatic transaction already completed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn cancel_automatic_transaction(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AutomaticTransactionDto>>, HandlerError> {
    let rule = state.service.cancel(id, Utc::now()).await.map_err(schedule_error)?;

    Ok(Json(ApiResponse {
        data: rule_to_dto(rule),
        message: "Automatic transaction cancelled".to_string(),
        success: true,
    }))
}

/// Pause an automatic transaction
#[utoipa::path(
    post,
    path = "/api/v1/automatic-transactions/{id}/pause",
    tag = "automatic-transactions",
    params(
        ("id" = i32, Path, description = "Automatic transaction ID"),
    ),
    responses(
        (status = 200, description = "Automatic transaction paused", body = ApiResponse<AutomaticTransactionDto>),
        (status = 404, description = "Automatic transaction not found", body = ErrorResponse),
        (status = 409, description = "Automatic transaction is cancelled or completed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn pause_automatic_transaction(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AutomaticTransactionDto>>, HandlerError> {
    let rule = state.service.pause(id, Utc::now()).await.map_err(schedule_error)?;

    Ok(Json(ApiResponse {
        data: rule_to_dto(rule),
        message: "Automatic transaction paused".to_string(),
        success: true,
    }))
}

/// Resume a paused automatic transaction from today on
#[utoipa::path(
    post,
    path = "/api/v1/automatic-transactions/{id}/resume",
    tag = "automatic-transactions",
    params(
        ("id" = i32, Path, description = "Automatic transaction ID"),
    ),
    responses(
        (status = 200, description = "Automatic transaction resumed", body = ApiResponse<AutomaticTransactionDto>),
        (status = 404, description = "Automatic transaction not found", body = ErrorResponse),
        (status = 409, description = "Automatic transaction is cancelled or completed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn resume_automatic_transaction(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AutomaticTransactionDto>>, HandlerError> {
    let rule = state.service.resume(id, Utc::now()).await.map_err(schedule_error)?;

    Ok(Json(ApiResponse {
        data: rule_to_dto(rule),
        message: "Automatic transaction resumed".to_string(),
        success: true,
    }))
}

/// Preview the upcoming execution dates of an automatic transaction
#[utoipa::path(
    get,
    path = "/api/v1/automatic-transactions/{id}/preview",
    tag = "automatic-transactions",
    params(
        ("id" = i32, Path, description = "Automatic transaction ID"),
        PreviewQuery,
    ),
    responses(
        (status = 200, description = "Upcoming execution dates", body = ApiResponse<Vec<NaiveDate>>),
        (status = 404, description = "Automatic transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn preview_automatic_transaction(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<PreviewQuery>>,
) -> Result<Json<ApiResponse<Vec<NaiveDate>>>, HandlerError> {
    let count = query.count.unwrap_or(DEFAULT_PREVIEW_COUNT);
    let dates = state.service.preview(id, count).await.map_err(schedule_error)?;

    debug!("Previewed {} dates for automatic transaction {}", dates.len(), id);
    Ok(Json(ApiResponse {
        data: dates,
        message: "Upcoming execution dates computed successfully".to_string(),
        success: true,
    }))
}

/// List the transactions generated by an automatic transaction
#[utoipa::path(
    get,
    path = "/api/v1/automatic-transactions/{id}/occurrences",
    tag = "automatic-transactions",
    params(
        ("id" = i32, Path, description = "Automatic transaction ID"),
    ),
    responses(
        (status = 200, description = "Generated transactions retrieved successfully", body = ApiResponse<Vec<OccurrenceDto>>),
        (status = 404, description = "Automatic transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_automatic_transaction_occurrences(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<OccurrenceDto>>>, HandlerError> {
    let occurrences = state.service.occurrences(id).await.map_err(schedule_error)?;

    debug!("Retrieved {} generated transactions", occurrences.len());
    Ok(Json(ApiResponse {
        data: occurrences.into_iter().map(occurrence_to_dto).collect(),
        message: "Generated transactions retrieved successfully".to_string(),
        success: true,
    }))
}
