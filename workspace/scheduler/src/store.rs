//! Store seams used by the engine.
//!
//! The engine only talks to persistence through [`ScheduleStore`] and
//! [`TransactionStore`]. The SeaORM implementations live in the submodules;
//! tests wrap them to inject failures.

pub mod schedule;
pub mod transactions;

pub use schedule::SeaOrmScheduleStore;
pub use transactions::SeaOrmTransactionStore;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use model::entities::automatic_transaction::{self, Direction, RuleStatus};
use model::entities::transaction;
use rust_decimal::Decimal;

use crate::error::StoreError;

/// Field changes applied to a rule after a successful firing.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleAdvance {
    pub next_execution_date: NaiveDate,
    pub status: RuleStatus,
    pub execution_count: i32,
    pub last_executed: DateTime<Utc>,
}

/// Everything needed to write one generated transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOccurrence {
    pub owner_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub direction: Direction,
    pub category: String,
    pub subcategory: Option<String>,
    pub description: String,
    pub notes: Option<String>,
    pub is_mandatory: bool,
    pub date: NaiveDate,
    pub automatic_transaction_id: i32,
    pub created_at: DateTime<Utc>,
}

impl NewOccurrence {
    /// Copies the template fields of `rule` for an occurrence on `date`.
    pub fn from_rule(
        rule: &automatic_transaction::Model,
        date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            owner_id: rule.owner_id.clone(),
            amount: rule.amount,
            currency: rule.currency.clone(),
            direction: rule.direction,
            category: rule.category.clone(),
            subcategory: rule.subcategory.clone(),
            description: rule.description.clone(),
            notes: rule.notes.clone(),
            is_mandatory: rule.is_mandatory,
            date,
            automatic_transaction_id: rule.id,
            created_at,
        }
    }
}

/// Read/write access to the persisted automatic transactions.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Active rules whose next execution date is on or before `today`.
    /// No ordering is promised.
    async fn find_due(&self, today: NaiveDate)
        -> Result<Vec<automatic_transaction::Model>, StoreError>;

    async fn find_by_id(&self, id: i32)
        -> Result<Option<automatic_transaction::Model>, StoreError>;

    async fn find_all_for_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<automatic_transaction::Model>, StoreError>;

    async fn insert(
        &self,
        rule: automatic_transaction::ActiveModel,
    ) -> Result<automatic_transaction::Model, StoreError>;

    /// Persists the set fields of `rule`; the primary key must be set.
    async fn save(
        &self,
        rule: automatic_transaction::ActiveModel,
    ) -> Result<automatic_transaction::Model, StoreError>;

    /// Applies `advance` only if the rule is still active and still scheduled
    /// for `expected_next`. Returns whether the write happened.
    async fn advance(
        &self,
        id: i32,
        expected_next: NaiveDate,
        advance: RuleAdvance,
    ) -> Result<bool, StoreError>;
}

/// Write access to concrete transactions.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn create(&self, occurrence: NewOccurrence) -> Result<transaction::Model, StoreError>;

    /// Transactions generated by one rule, oldest first.
    async fn find_for_rule(&self, rule_id: i32) -> Result<Vec<transaction::Model>, StoreError>;
}
