use axum::{http::StatusCode, response::Json};
use scheduler::error::ScheduleError;
use thiserror::Error;
use tracing::{error, warn};

use crate::schemas::ErrorResponse;

/// Error half of every handler result.
pub type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Failures surfaced by the HTTP layer.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("Missing or invalid cron credentials")]
    Unauthorized,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Schedule(ScheduleError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Schedule(ScheduleError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Schedule(ScheduleError::InvalidState { .. }) => StatusCode::CONFLICT,
            ApiError::Schedule(ScheduleError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Schedule(ScheduleError::Validation(_)) => "VALIDATION_ERROR",
            ApiError::Schedule(ScheduleError::NotFound(_)) => "NOT_FOUND",
            ApiError::Schedule(ScheduleError::InvalidState { .. }) => "INVALID_STATE",
            ApiError::Schedule(ScheduleError::Store(_)) => "DATABASE_ERROR",
            ApiError::Unauthorized => "UNAUTHORIZED",
        }
    }
}

impl From<ApiError> for HandlerError {
    fn from(error: ApiError) -> Self {
        let status = error.status();
        if status.is_server_error() {
            error!("{}", error);
        } else {
            warn!("{}", error);
        }
        (status, Json(ErrorResponse::new(error.code(), error.to_string())))
    }
}

/// Shorthand for mapping engine errors inside handlers.
pub fn schedule_error(error: ScheduleError) -> HandlerError {
    ApiError::from(error).into()
}
