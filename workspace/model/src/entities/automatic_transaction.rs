use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::transaction;
use crate::recurrence::{Recurrence, RecurrencePattern, ValidationError};

/// Base period of an automatic transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum RecurrenceType {
    #[sea_orm(string_value = "daily")]
    Daily,
    #[sea_orm(string_value = "weekly")]
    Weekly,
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

/// Lifecycle state of an automatic transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum RuleStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "paused")]
    Paused,
    #[sea_orm(string_value = "completed")]
    Completed, // end date passed, frozen
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl RuleStatus {
    /// Completed and cancelled rules never fire again.
    pub fn is_terminal(self) -> bool {
        matches!(self, RuleStatus::Completed | RuleStatus::Cancelled)
    }
}

/// Whether money comes in or goes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(7))")]
pub enum Direction {
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// A recurring schedule that materializes into concrete transactions.
///
/// All schedule dates are calendar dates in the engine's canonical timezone;
/// no time-of-day is stored for them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "automatic_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Owning user. Opaque to the engine.
    pub owner_id: String,
    /// Always positive; the sign lives in `direction`.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub notes: Option<String>,
    pub is_mandatory: bool,
    pub direction: Direction,
    pub recurrence_type: RecurrenceType,
    pub recurrence_interval: i32,
    /// 1-31, monthly and yearly only.
    pub day_of_month: Option<i32>,
    /// 0-6 with 0 = Sunday, weekly only.
    pub day_of_week: Option<i32>,
    /// Earliest possible occurrence.
    pub start_date: NaiveDate,
    /// Inclusive upper bound for occurrences.
    pub end_date: Option<NaiveDate>,
    /// When the rule fires next. Frozen once the rule is completed.
    pub next_execution_date: NaiveDate,
    pub status: RuleStatus,
    pub execution_count: i32,
    pub last_executed: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// The typed recurrence described by this row.
    pub fn pattern(&self) -> Result<RecurrencePattern, ValidationError> {
        let recurrence =
            Recurrence::from_parts(self.recurrence_type, self.day_of_month, self.day_of_week)?;
        RecurrencePattern::new(recurrence, self.recurrence_interval)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "transaction::Entity")]
    Transaction,
}

impl Related<transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
