use crate::handlers::{
    admin::recalculate_owner,
    automatic_transactions::{
        cancel_automatic_transaction, create_automatic_transaction, get_automatic_transaction,
        get_automatic_transaction_occurrences, get_automatic_transactions,
        pause_automatic_transaction, preview_automatic_transaction, resume_automatic_transaction,
        update_automatic_transaction,
    },
    cron::process_due,
    health::health_check,
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let request_timeout = state.settings.request_timeout();

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Automatic transaction lifecycle
        .route(
            "/api/v1/automatic-transactions",
            post(create_automatic_transaction).get(get_automatic_transactions),
        )
        .route(
            "/api/v1/automatic-transactions/:id",
            get(get_automatic_transaction).put(update_automatic_transaction),
        )
        .route("/api/v1/automatic-transactions/:id/cancel", post(cancel_automatic_transaction))
        .route("/api/v1/automatic-transactions/:id/pause", post(pause_automatic_transaction))
        .route("/api/v1/automatic-transactions/:id/resume", post(resume_automatic_transaction))
        .route("/api/v1/automatic-transactions/:id/preview", get(preview_automatic_transaction))
        .route(
            "/api/v1/automatic-transactions/:id/occurrences",
            get(get_automatic_transaction_occurrences),
        )
        // External trigger
        .route("/api/v1/cron/process", post(process_due))
        // Administration
        .route("/api/v1/admin/owners/:owner_id/recalculate", post(recalculate_owner))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
