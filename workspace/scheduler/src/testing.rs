//! Shared helpers for the scheduler tests: an in-memory database, a rule
//! builder and store wrappers that fail or stall on demand.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use migration::{Migrator, MigratorTrait};
use model::entities::automatic_transaction::{self, Direction, RecurrenceType, RuleStatus};
use model::entities::transaction;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, DbErr, Set};

use crate::error::StoreError;
use crate::store::{
    NewOccurrence, RuleAdvance, ScheduleStore, SeaOrmScheduleStore, SeaOrmTransactionStore,
    TransactionStore,
};

pub async fn setup_db() -> Result<DatabaseConnection, DbErr> {
    // Connect to the SQLite database
    let db = Database::connect("sqlite::memory:").await?;

    // Enable foreign keys
    db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

    Migrator::up(&db, None).await.expect("Migrations failed.");
    Ok(db)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Noon UTC on the given day.
pub fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

/// Builder for a persisted rule. Defaults to an active 50.00 EUR expense
/// owned by `user-1`, scheduled on its start date.
#[derive(Debug, Clone)]
pub struct RuleSeed {
    pub owner_id: String,
    pub amount: Decimal,
    pub recurrence_type: RecurrenceType,
    pub interval: i32,
    pub day_of_month: Option<i32>,
    pub day_of_week: Option<i32>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub next_execution_date: Option<NaiveDate>,
    pub status: RuleStatus,
    pub execution_count: i32,
}

impl RuleSeed {
    pub fn new(recurrence_type: RecurrenceType, interval: i32) -> Self {
        Self {
            owner_id: "user-1".to_string(),
            amount: Decimal::new(5000, 2),
            recurrence_type,
            interval,
            day_of_month: None,
            day_of_week: None,
            start_date: date(2025, 1, 1),
            end_date: None,
            next_execution_date: None,
            status: RuleStatus::Active,
            execution_count: 0,
        }
    }

    pub fn owner(mut self, owner_id: &str) -> Self {
        self.owner_id = owner_id.to_string();
        self
    }

    pub fn starting(mut self, start_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self
    }

    pub fn next(mut self, next: NaiveDate) -> Self {
        self.next_execution_date = Some(next);
        self
    }

    pub fn ending(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn day_of_month(mut self, day: i32) -> Self {
        self.day_of_month = Some(day);
        self
    }

    pub fn day_of_week(mut self, day: i32) -> Self {
        self.day_of_week = Some(day);
        self
    }

    pub fn status(mut self, status: RuleStatus) -> Self {
        self.status = status;
        self
    }
}

pub async fn insert_rule(
    db: &DatabaseConnection,
    seed: RuleSeed,
) -> Result<automatic_transaction::Model, DbErr> {
    let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    automatic_transaction::ActiveModel {
        owner_id: Set(seed.owner_id),
        amount: Set(seed.amount),
        currency: Set("EUR".to_string()),
        description: Set("Subscription".to_string()),
        category: Set("Bills".to_string()),
        subcategory: Set(None),
        notes: Set(None),
        is_mandatory: Set(true),
        direction: Set(Direction::Expense),
        recurrence_type: Set(seed.recurrence_type),
        recurrence_interval: Set(seed.interval),
        day_of_month: Set(seed.day_of_month),
        day_of_week: Set(seed.day_of_week),
        start_date: Set(seed.start_date),
        end_date: Set(seed.end_date),
        next_execution_date: Set(seed.next_execution_date.unwrap_or(seed.start_date)),
        status: Set(seed.status),
        execution_count: Set(seed.execution_count),
        last_executed: Set(None),
        created_at: Set(created),
        updated_at: Set(created),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// SeaORM stores over `db`.
pub fn stores(db: &DatabaseConnection) -> (Arc<SeaOrmScheduleStore>, Arc<SeaOrmTransactionStore>) {
    (
        Arc::new(SeaOrmScheduleStore::new(db.clone())),
        Arc::new(SeaOrmTransactionStore::new(db.clone())),
    )
}

/// How a wrapped store misbehaves for the selected rules.
#[derive(Debug, Clone, Copy)]
pub enum Fault {
    Fail,
    Stall(Duration),
}

/// A [`TransactionStore`] that fails or stalls writes for chosen rule ids.
pub struct FaultyTransactionStore {
    inner: Arc<dyn TransactionStore>,
    rule_ids: HashSet<i32>,
    fault: Fault,
}

impl FaultyTransactionStore {
    pub fn new(inner: Arc<dyn TransactionStore>, rule_ids: &[i32], fault: Fault) -> Self {
        Self {
            inner,
            rule_ids: rule_ids.iter().copied().collect(),
            fault,
        }
    }
}

#[async_trait]
impl TransactionStore for FaultyTransactionStore {
    async fn create(&self, occurrence: NewOccurrence) -> Result<transaction::Model, StoreError> {
        if self.rule_ids.contains(&occurrence.automatic_transaction_id) {
            match self.fault {
                Fault::Fail => {
                    return Err(StoreError::Unavailable("write timed out".to_string()));
                }
                Fault::Stall(delay) => tokio::time::sleep(delay).await,
            }
        }
        self.inner.create(occurrence).await
    }

    async fn find_for_rule(&self, rule_id: i32) -> Result<Vec<transaction::Model>, StoreError> {
        self.inner.find_for_rule(rule_id).await
    }
}

/// A [`ScheduleStore`] wrapper that can refuse to list due rules and can
/// simulate a competing pass advancing a rule right after it was re-read.
pub struct FaultyScheduleStore {
    inner: Arc<dyn ScheduleStore>,
    fail_find_due: bool,
    race_on: Option<i32>,
    advances: AtomicUsize,
}

impl FaultyScheduleStore {
    pub fn new(inner: Arc<dyn ScheduleStore>) -> Self {
        Self {
            inner,
            fail_find_due: false,
            race_on: None,
            advances: AtomicUsize::new(0),
        }
    }

    pub fn failing_find_due(mut self) -> Self {
        self.fail_find_due = true;
        self
    }

    /// Before the first advance of `rule_id`, moves its schedule one day
    /// forward as a concurrent writer would.
    pub fn racing_on(mut self, rule_id: i32) -> Self {
        self.race_on = Some(rule_id);
        self
    }

    pub fn advance_calls(&self) -> usize {
        self.advances.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScheduleStore for FaultyScheduleStore {
    async fn find_due(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<automatic_transaction::Model>, StoreError> {
        if self.fail_find_due {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        self.inner.find_due(today).await
    }

    async fn find_by_id(
        &self,
        id: i32,
    ) -> Result<Option<automatic_transaction::Model>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn find_all_for_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<automatic_transaction::Model>, StoreError> {
        self.inner.find_all_for_owner(owner_id).await
    }

    async fn insert(
        &self,
        rule: automatic_transaction::ActiveModel,
    ) -> Result<automatic_transaction::Model, StoreError> {
        self.inner.insert(rule).await
    }

    async fn save(
        &self,
        rule: automatic_transaction::ActiveModel,
    ) -> Result<automatic_transaction::Model, StoreError> {
        self.inner.save(rule).await
    }

    async fn advance(
        &self,
        id: i32,
        expected_next: NaiveDate,
        advance: RuleAdvance,
    ) -> Result<bool, StoreError> {
        let calls = self.advances.fetch_add(1, Ordering::SeqCst);
        if self.race_on == Some(id) && calls == 0 {
            let competing = RuleAdvance {
                next_execution_date: expected_next.succ_opt().unwrap_or(NaiveDate::MAX),
                ..advance.clone()
            };
            self.inner.advance(id, expected_next, competing).await?;
        }
        self.inner.advance(id, expected_next, advance).await
    }
}
