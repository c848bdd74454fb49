use crate::helpers::converters::batch_result_to_dto;
use crate::helpers::errors::{ApiError, HandlerError};
use crate::schemas::{AppState, ErrorResponse};
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::Json,
};
use chrono::Utc;
use common::{ApiResponse, BatchResultDto};
use scheduler::BatchResult;
use tracing::{debug, error, info, instrument, trace, warn};

/// Compares two secrets in time independent of where they first differ.
fn secrets_match(presented: &str, expected: &str) -> bool {
    let (presented, expected) = (presented.as_bytes(), expected.as_bytes());
    if presented.len() != expected.len() {
        return false;
    }
    presented
        .iter()
        .zip(expected)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

/// Checks the `Authorization: Bearer <secret>` header against the configured
/// cron secret. Without a configured secret every caller is accepted.
pub fn authorize_trigger(headers: &HeaderMap, secret: Option<&str>) -> Result<(), ApiError> {
    let Some(secret) = secret else {
        trace!("No cron secret configured, accepting caller");
        return Ok(());
    };

    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match presented {
        Some(token) if secrets_match(token, secret) => Ok(()),
        Some(_) => {
            warn!("Rejected trigger with wrong credentials");
            Err(ApiError::Unauthorized)
        }
        None => {
            warn!("Rejected trigger without credentials");
            Err(ApiError::Unauthorized)
        }
    }
}

/// Materialize every due automatic transaction
///
/// Meant to be called by a single periodic trigger (cron). Each due rule is
/// fired independently; failures are listed in `errors` without stopping the
/// pass.
#[utoipa::path(
    post,
    path = "/api/v1/cron/process",
    tag = "cron",
    responses(
        (status = 200, description = "Processing pass finished", body = ApiResponse<BatchResultDto>),
        (status = 401, description = "Missing or invalid cron credentials", body = ErrorResponse),
        (status = 500, description = "Due rules could not be listed", body = ApiResponse<BatchResultDto>)
    )
)]
#[instrument(skip(state, headers))]
pub async fn process_due(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<ApiResponse<BatchResultDto>>), HandlerError> {
    trace!("Entering process_due function");
    authorize_trigger(&headers, state.settings.server.cron_secret.as_deref())?;

    let now = Utc::now();
    debug!("Running processing pass at {}", now);

    match state.processor.run_once(now).await {
        Ok(result) => {
            info!(
                "Processing pass finished: {} processed, {} failed",
                result.processed_count,
                result.errors.len()
            );
            let message = if result.errors.is_empty() {
                "Due automatic transactions processed".to_string()
            } else {
                format!("Processed with {} errors", result.errors.len())
            };
            Ok((
                StatusCode::OK,
                Json(ApiResponse {
                    data: batch_result_to_dto(result),
                    message,
                    success: true,
                }),
            ))
        }
        Err(e) => {
            error!("Processing pass aborted: {}", e);
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse {
                    data: batch_result_to_dto(BatchResult::aborted(&e)),
                    message: "Due automatic transactions could not be listed".to_string(),
                    success: false,
                }),
            ))
        }
    }
}
