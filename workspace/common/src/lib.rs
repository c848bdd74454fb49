//! Common transport-layer types shared between the HTTP handlers, the CLI
//! and API clients. Field names are the JSON wire names.

mod processing;
mod rules;

pub use processing::{BatchOutcomeDto, BatchResultDto, RecalculationReportDto};
pub use rules::{
    AutomaticTransactionDto, CreateAutomaticTransactionRequest, DirectionDto, OccurrenceDto,
    PreviewQuery, RecurrenceTypeDto, RuleStatusDto, UpdateAutomaticTransactionRequest,
};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper used by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}
