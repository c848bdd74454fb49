use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Base period of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceTypeDto {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Lifecycle state of a rule. Only `active` rules are ever fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatusDto {
    Active,
    Paused,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DirectionDto {
    Income,
    Expense,
}

fn positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_positive() && !amount.is_zero() {
        Ok(())
    } else {
        Err(ValidationError::new("amount_not_positive"))
    }
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Request body for creating an automatic transaction.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, PartialEq)]
pub struct CreateAutomaticTransactionRequest {
    /// Owner of the rule and of every generated transaction
    #[validate(length(min = 1, max = 128))]
    pub owner_id: String,
    /// Amount of each generated transaction, always positive
    #[validate(custom(function = "positive_amount"))]
    #[schema(value_type = String, example = "1200.00")]
    pub amount: Decimal,
    /// ISO 4217 code
    #[validate(length(equal = 3))]
    pub currency: String,
    #[validate(length(min = 1, max = 255))]
    pub description: String,
    #[validate(length(min = 1, max = 128))]
    pub category: String,
    pub subcategory: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub is_mandatory: bool,
    pub direction: DirectionDto,
    pub recurrence_type: RecurrenceTypeDto,
    /// Multiplier of the base period, e.g. 2 + weekly = every other week
    #[validate(range(min = 1, max = 1000))]
    pub recurrence_interval: i32,
    /// Monthly/yearly anchor, clamped to short months
    #[validate(range(min = 1, max = 31))]
    pub day_of_month: Option<i32>,
    /// Weekly anchor, 0 = Sunday
    #[validate(range(min = 0, max = 6))]
    pub day_of_week: Option<i32>,
    /// First day the rule may fire (YYYY-MM-DD)
    pub start_date: NaiveDate,
    /// Last day the rule may fire (YYYY-MM-DD)
    pub end_date: Option<NaiveDate>,
}

/// Request body for editing an automatic transaction. Omitted fields are left
/// unchanged; `null` clears a nullable field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate, PartialEq)]
pub struct UpdateAutomaticTransactionRequest {
    #[schema(value_type = Option<String>)]
    pub amount: Option<Decimal>,
    #[validate(length(equal = 3))]
    pub currency: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub subcategory: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
    pub is_mandatory: Option<bool>,
    pub direction: Option<DirectionDto>,
    pub recurrence_type: Option<RecurrenceTypeDto>,
    #[validate(range(min = 1, max = 1000))]
    pub recurrence_interval: Option<i32>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i32>)]
    pub day_of_month: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i32>)]
    pub day_of_week: Option<Option<i32>>,
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<NaiveDate>)]
    pub end_date: Option<Option<NaiveDate>>,
}

/// Automatic transaction response model.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AutomaticTransactionDto {
    pub id: i32,
    pub owner_id: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub notes: Option<String>,
    pub is_mandatory: bool,
    pub direction: DirectionDto,
    pub recurrence_type: RecurrenceTypeDto,
    pub recurrence_interval: i32,
    pub day_of_month: Option<i32>,
    pub day_of_week: Option<i32>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub next_execution_date: NaiveDate,
    pub status: RuleStatusDto,
    pub execution_count: i32,
    pub last_executed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A transaction generated by a rule.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct OccurrenceDto {
    pub id: i32,
    pub automatic_transaction_id: Option<i32>,
    pub owner_id: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub currency: String,
    pub direction: DirectionDto,
    pub category: String,
    pub subcategory: Option<String>,
    pub description: String,
    pub notes: Option<String>,
    pub is_mandatory: bool,
    pub is_automatic: bool,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Query parameters for the schedule preview.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, IntoParams, Validate, PartialEq)]
pub struct PreviewQuery {
    /// Number of dates to return (default 12)
    #[validate(range(min = 1, max = 366))]
    pub count: Option<usize>,
}
