use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::rules::RuleStatusDto;

/// One rule fired during a batch pass.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BatchOutcomeDto {
    pub automatic_transaction_id: i32,
    /// The generated transaction
    pub transaction_id: i32,
    pub transaction_date: NaiveDate,
    pub next_execution_date: NaiveDate,
    pub status: RuleStatusDto,
}

/// Result of one "process due occurrences" pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BatchResultDto {
    /// Number of rules fired successfully
    pub processed_count: usize,
    /// One message per failed rule, naming the rule id
    pub errors: Vec<String>,
    #[serde(default)]
    pub outcomes: Vec<BatchOutcomeDto>,
}

/// Result of recalculating every schedule of one owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct RecalculationReportDto {
    pub owner_id: String,
    pub updated: usize,
    pub unchanged: usize,
    /// Cancelled and completed rules are not touched
    pub skipped: usize,
    pub errors: Vec<String>,
}
