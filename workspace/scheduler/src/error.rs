use std::time::Duration;

use chrono::NaiveDate;
use model::entities::automatic_transaction::RuleStatus;
use thiserror::Error;

pub use model::recurrence::ValidationError;

/// Failure reading or writing the schedule or transaction store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// The store could not be reached or refused the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Why a single rule could not be fired.
#[derive(Error, Debug)]
pub enum MaterializationErrorKind {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The stored rule no longer describes a valid schedule
    #[error("invalid rule: {0}")]
    InvalidRule(#[from] ValidationError),

    /// Another writer moved the rule since it was read
    #[error(
        "schedule changed concurrently (expected next execution {expected}){}",
        duplicate_hint(.occurrence_id)
    )]
    Conflict {
        expected: NaiveDate,
        occurrence_id: Option<i32>,
    },

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

fn duplicate_hint(occurrence_id: &Option<i32>) -> String {
    match occurrence_id {
        Some(id) => format!(", transaction {} may be a duplicate", id),
        None => String::new(),
    }
}

/// Failure while firing one specific rule. Always names the rule.
#[derive(Error, Debug)]
#[error("Failed to materialize automatic transaction {rule_id}: {kind}")]
pub struct MaterializationError {
    pub rule_id: i32,
    #[source]
    pub kind: MaterializationErrorKind,
}

impl MaterializationError {
    pub fn new(rule_id: i32, kind: impl Into<MaterializationErrorKind>) -> Self {
        Self {
            rule_id,
            kind: kind.into(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self.kind, MaterializationErrorKind::Conflict { .. })
    }
}

/// A batch pass that could not even start.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Failed to list due automatic transactions: {0}")]
    FetchDue(#[source] StoreError),
}

/// Errors from the rule lifecycle operations.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Automatic transaction {0} not found")]
    NotFound(i32),

    #[error("Automatic transaction {id} is {status:?} and cannot be {action}")]
    InvalidState {
        id: i32,
        status: RuleStatus,
        action: &'static str,
    },
}

impl From<sea_orm::DbErr> for ScheduleError {
    fn from(error: sea_orm::DbErr) -> Self {
        ScheduleError::Store(StoreError::Database(error))
    }
}

/// Type alias for Result with ScheduleError
pub type Result<T> = std::result::Result<T, ScheduleError>;
