use std::sync::Arc;

use common::{
    ApiResponse, AutomaticTransactionDto, BatchOutcomeDto, BatchResultDto,
    CreateAutomaticTransactionRequest, DirectionDto, OccurrenceDto, RecalculationReportDto,
    RecurrenceTypeDto, RuleStatusDto, UpdateAutomaticTransactionRequest,
};
use scheduler::{AutomaticTransactionService, BatchProcessor};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::config::Settings;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    pub settings: Arc<Settings>,
    /// Rule lifecycle operations
    pub service: Arc<AutomaticTransactionService>,
    /// The "process due occurrences" pass behind the cron endpoint
    pub processor: Arc<BatchProcessor>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, settings: Arc<Settings>) -> Self {
        let calendar = settings.calendar();
        let service = scheduler::default_service(db.clone(), calendar);
        let processor =
            scheduler::default_processor(db.clone(), calendar, settings.rule_timeout());

        Self {
            db,
            settings,
            service: Arc::new(service),
            processor: Arc::new(processor),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

impl ErrorResponse {
    pub fn new(code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            success: false,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::automatic_transactions::create_automatic_transaction,
        crate::handlers::automatic_transactions::get_automatic_transactions,
        crate::handlers::automatic_transactions::get_automatic_transaction,
        crate::handlers::automatic_transactions::update_automatic_transaction,
        crate::handlers::automatic_transactions::cancel_automatic_transaction,
        crate::handlers::automatic_transactions::pause_automatic_transaction,
        crate::handlers::automatic_transactions::resume_automatic_transaction,
        crate::handlers::automatic_transactions::preview_automatic_transaction,
        crate::handlers::automatic_transactions::get_automatic_transaction_occurrences,
        crate::handlers::cron::process_due,
        crate::handlers::admin::recalculate_owner,
    ),
    components(
        schemas(
            ApiResponse<AutomaticTransactionDto>,
            ApiResponse<Vec<AutomaticTransactionDto>>,
            ApiResponse<Vec<OccurrenceDto>>,
            ApiResponse<BatchResultDto>,
            ApiResponse<RecalculationReportDto>,
            ErrorResponse,
            HealthResponse,
            AutomaticTransactionDto,
            CreateAutomaticTransactionRequest,
            UpdateAutomaticTransactionRequest,
            OccurrenceDto,
            BatchResultDto,
            BatchOutcomeDto,
            RecalculationReportDto,
            RecurrenceTypeDto,
            RuleStatusDto,
            DirectionDto,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "automatic-transactions", description = "Recurring transaction rules"),
        (name = "cron", description = "Trigger for materializing due transactions"),
        (name = "admin", description = "Administrative schedule repair"),
    ),
    info(
        title = "AutoTx API",
        description = "Recurring transaction scheduling engine",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
