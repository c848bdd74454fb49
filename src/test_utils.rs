use crate::config::Settings;
use crate::router::create_router;
use crate::schemas::AppState;
use axum::Router;
use chrono::{NaiveDate, Utc};
use migration::{Migrator, MigratorTrait};
use model::entities::automatic_transaction::{self, Direction, RecurrenceType, RuleStatus};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Create an in-memory SQLite database for testing
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    // Run migrations
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Settings for tests, optionally protecting the trigger with `cron_secret`
pub fn test_settings(cron_secret: Option<&str>) -> Settings {
    let mut settings = Settings::default();
    settings.database_url = "sqlite::memory:".to_string();
    settings.server.cron_secret = cron_secret.map(str::to_string);
    settings.scheduler.rule_timeout_secs = 5;
    settings
}

/// Create AppState for testing
pub async fn setup_test_app_state(settings: Settings) -> AppState {
    let db = setup_test_db().await;
    AppState::new(db, Arc::new(settings))
}

/// Initialize tracing for tests with output to STDERR.
///
/// The log level is read from RUST_LOG, defaulting to WARN.
fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::WARN);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_default(subscriber)
}

/// Create axum app for testing, returning the state so tests can seed data
pub async fn setup_test_app_with(settings: Settings) -> (Router, AppState) {
    let _guard = init_test_tracing();

    let state = setup_test_app_state(settings).await;
    (create_router(state.clone()), state)
}

/// Create axum app for testing
pub async fn setup_test_app() -> Router {
    setup_test_app_with(test_settings(None)).await.0
}

/// Insert an active rule without anchors directly, bypassing first-date placement.
pub async fn seed_due_rule(
    db: &DatabaseConnection,
    owner_id: &str,
    recurrence_type: RecurrenceType,
    next_execution_date: NaiveDate,
) -> automatic_transaction::Model {
    let now = Utc::now();
    automatic_transaction::ActiveModel {
        owner_id: Set(owner_id.to_string()),
        amount: Set(Decimal::new(999, 2)),
        currency: Set("EUR".to_string()),
        description: Set("Streaming".to_string()),
        category: Set("Entertainment".to_string()),
        subcategory: Set(None),
        notes: Set(None),
        is_mandatory: Set(false),
        direction: Set(Direction::Expense),
        recurrence_type: Set(recurrence_type),
        recurrence_interval: Set(1),
        day_of_month: Set(None),
        day_of_week: Set(None),
        start_date: Set(next_execution_date),
        end_date: Set(None),
        next_execution_date: Set(next_execution_date),
        status: Set(RuleStatus::Active),
        execution_count: Set(0),
        last_executed: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed automatic transaction")
}
