//! Lifecycle operations on automatic transactions: create, edit, pause,
//! resume, cancel and the owner-wide recalculation used to repair schedules.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use model::entities::automatic_transaction::{self, Direction, RecurrenceType, RuleStatus};
use model::entities::transaction;
use model::recurrence::{Recurrence, RecurrencePattern};
use rust_decimal::Decimal;
use sea_orm::{IntoActiveModel, Set};
use tracing::{debug, info, instrument, warn};

use crate::calendar::Calendar;
use crate::error::{Result, ScheduleError, ValidationError};
use crate::recurrence::{initial_next_from, occurrences_from};
use crate::store::{ScheduleStore, TransactionStore};

/// Parameters of a new automatic transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRule {
    pub owner_id: String,
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
    pub day_of_month: Option<i32>,
    pub day_of_week: Option<i32>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// A partial edit. `None` leaves a field untouched; for nullable fields
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleUpdate {
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub is_mandatory: Option<bool>,
    pub direction: Option<Direction>,
    pub recurrence_type: Option<RecurrenceType>,
    pub recurrence_interval: Option<i32>,
    pub day_of_month: Option<Option<i32>>,
    pub day_of_week: Option<Option<i32>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<Option<NaiveDate>>,
}

impl RuleUpdate {
    /// Whether the edit touches anything the schedule is computed from.
    pub fn changes_schedule(&self) -> bool {
        self.recurrence_type.is_some()
            || self.recurrence_interval.is_some()
            || self.day_of_month.is_some()
            || self.day_of_week.is_some()
            || self.start_date.is_some()
    }
}

/// Outcome of [`AutomaticTransactionService::recalculate_for_owner`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecalculationReport {
    pub updated: usize,
    pub unchanged: usize,
    /// Terminal rules are left alone.
    pub skipped: usize,
    pub errors: Vec<String>,
}

fn require_text(value: &str, field: &'static str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(())
    }
}

fn validate_currency(currency: &str) -> std::result::Result<(), ValidationError> {
    if currency.len() == 3 && currency.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidCurrency(currency.to_string()))
    }
}

fn validate_amount(amount: Decimal) -> std::result::Result<(), ValidationError> {
    if amount <= Decimal::ZERO {
        Err(ValidationError::NonPositiveAmount(amount))
    } else {
        Ok(())
    }
}

fn validate_bounds(
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> std::result::Result<(), ValidationError> {
    match end {
        Some(end) if end < start => Err(ValidationError::EndBeforeStart { start, end }),
        _ => Ok(()),
    }
}

fn build_pattern(
    kind: RecurrenceType,
    interval: i32,
    day_of_month: Option<i32>,
    day_of_week: Option<i32>,
) -> std::result::Result<RecurrencePattern, ValidationError> {
    RecurrencePattern::new(
        Recurrence::from_parts(kind, day_of_month, day_of_week)?,
        interval,
    )
}

/// A schedule whose first date already lies past its end can never fire.
fn status_for(next: NaiveDate, end: Option<NaiveDate>) -> RuleStatus {
    match end {
        Some(end) if next > end => RuleStatus::Completed,
        _ => RuleStatus::Active,
    }
}

/// Rule lifecycle on top of the store seams.
pub struct AutomaticTransactionService {
    schedule: Arc<dyn ScheduleStore>,
    transactions: Arc<dyn TransactionStore>,
    calendar: Calendar,
}

impl AutomaticTransactionService {
    pub fn new(
        schedule: Arc<dyn ScheduleStore>,
        transactions: Arc<dyn TransactionStore>,
        calendar: Calendar,
    ) -> Self {
        Self {
            schedule,
            transactions,
            calendar,
        }
    }

    pub async fn get(&self, id: i32) -> Result<automatic_transaction::Model> {
        self.schedule
            .find_by_id(id)
            .await?
            .ok_or(ScheduleError::NotFound(id))
    }

    pub async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<automatic_transaction::Model>> {
        Ok(self.schedule.find_all_for_owner(owner_id).await?)
    }

    /// Transactions generated so far by a rule.
    pub async fn occurrences(&self, id: i32) -> Result<Vec<transaction::Model>> {
        let rule = self.get(id).await?;
        Ok(self.transactions.find_for_rule(rule.id).await?)
    }

    /// Validates and stores a new rule with its first execution date.
    #[instrument(skip(self, rule, now), fields(owner_id = %rule.owner_id, kind = ?rule.recurrence_type))]
    pub async fn create(
        &self,
        rule: NewRule,
        now: DateTime<Utc>,
    ) -> Result<automatic_transaction::Model> {
        require_text(&rule.owner_id, "owner_id")?;
        validate_currency(&rule.currency)?;
        require_text(&rule.description, "description")?;
        require_text(&rule.category, "category")?;
        validate_amount(rule.amount)?;
        validate_bounds(rule.start_date, rule.end_date)?;
        let pattern = build_pattern(
            rule.recurrence_type,
            rule.recurrence_interval,
            rule.day_of_month,
            rule.day_of_week,
        )?;

        let today = self.calendar.today(now);
        let next = initial_next_from(rule.start_date, today, &pattern);
        let status = status_for(next, rule.end_date);
        debug!(%next, ?status, "Computed first execution date");

        let created = self
            .schedule
            .insert(automatic_transaction::ActiveModel {
                owner_id: Set(rule.owner_id),
                amount: Set(rule.amount),
                currency: Set(rule.currency),
                description: Set(rule.description),
                category: Set(rule.category),
                subcategory: Set(rule.subcategory),
                notes: Set(rule.notes),
                is_mandatory: Set(rule.is_mandatory),
                direction: Set(rule.direction),
                recurrence_type: Set(rule.recurrence_type),
                recurrence_interval: Set(rule.recurrence_interval),
                day_of_month: Set(rule.day_of_month),
                day_of_week: Set(rule.day_of_week),
                start_date: Set(rule.start_date),
                end_date: Set(rule.end_date),
                next_execution_date: Set(next),
                status: Set(status),
                execution_count: Set(0),
                last_executed: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            })
            .await?;

        info!("Created automatic transaction {}", created.id);
        Ok(created)
    }

    /// Applies a partial edit. Changing the recurrence or the start date
    /// recomputes the next execution date from scratch.
    #[instrument(skip(self, update, now))]
    pub async fn update(
        &self,
        id: i32,
        update: RuleUpdate,
        now: DateTime<Utc>,
    ) -> Result<automatic_transaction::Model> {
        let rule = self.get(id).await?;
        if rule.status.is_terminal() {
            return Err(ScheduleError::InvalidState {
                id,
                status: rule.status,
                action: "edited",
            });
        }

        let amount = update.amount.unwrap_or(rule.amount);
        validate_amount(amount)?;
        if let Some(currency) = &update.currency {
            validate_currency(currency)?;
        }
        for (value, field) in [
            (&update.description, "description"),
            (&update.category, "category"),
        ] {
            if let Some(value) = value {
                require_text(value, field)?;
            }
        }

        let recurrence_type = update.recurrence_type.unwrap_or(rule.recurrence_type);
        let interval = update.recurrence_interval.unwrap_or(rule.recurrence_interval);
        let day_of_month = update.day_of_month.unwrap_or(rule.day_of_month);
        let day_of_week = update.day_of_week.unwrap_or(rule.day_of_week);
        let start_date = update.start_date.unwrap_or(rule.start_date);
        let end_date = update.end_date.unwrap_or(rule.end_date);
        validate_bounds(start_date, end_date)?;
        let pattern = build_pattern(recurrence_type, interval, day_of_month, day_of_week)?;

        let next = if update.changes_schedule() {
            let next = initial_next_from(start_date, self.calendar.today(now), &pattern);
            debug!(previous = %rule.next_execution_date, %next, "Recalculated schedule after edit");
            next
        } else {
            rule.next_execution_date
        };

        let mut active = rule.clone().into_active_model();
        active.amount = Set(amount);
        if let Some(currency) = update.currency {
            active.currency = Set(currency);
        }
        if let Some(description) = update.description {
            active.description = Set(description);
        }
        if let Some(category) = update.category {
            active.category = Set(category);
        }
        if let Some(subcategory) = update.subcategory {
            active.subcategory = Set(subcategory);
        }
        if let Some(notes) = update.notes {
            active.notes = Set(notes);
        }
        if let Some(is_mandatory) = update.is_mandatory {
            active.is_mandatory = Set(is_mandatory);
        }
        if let Some(direction) = update.direction {
            active.direction = Set(direction);
        }
        active.recurrence_type = Set(recurrence_type);
        active.recurrence_interval = Set(interval);
        active.day_of_month = Set(day_of_month);
        active.day_of_week = Set(day_of_week);
        active.start_date = Set(start_date);
        active.end_date = Set(end_date);
        active.next_execution_date = Set(next);
        if rule.status == RuleStatus::Active {
            active.status = Set(status_for(next, end_date));
        }
        active.updated_at = Set(now);

        let saved = self.schedule.save(active).await?;
        info!("Updated automatic transaction {}", saved.id);
        Ok(saved)
    }

    /// Soft-deletes a rule. Cancelling twice is a no-op.
    #[instrument(skip(self, now))]
    pub async fn cancel(&self, id: i32, now: DateTime<Utc>) -> Result<automatic_transaction::Model> {
        let rule = self.get(id).await?;
        match rule.status {
            RuleStatus::Cancelled => Ok(rule),
            RuleStatus::Completed => Err(ScheduleError::InvalidState {
                id,
                status: rule.status,
                action: "cancelled",
            }),
            RuleStatus::Active | RuleStatus::Paused => {
                self.set_status(rule, RuleStatus::Cancelled, None, now).await
            }
        }
    }

    /// Stops a rule from becoming due until it is resumed.
    #[instrument(skip(self, now))]
    pub async fn pause(&self, id: i32, now: DateTime<Utc>) -> Result<automatic_transaction::Model> {
        let rule = self.get(id).await?;
        match rule.status {
            RuleStatus::Paused => Ok(rule),
            RuleStatus::Active => self.set_status(rule, RuleStatus::Paused, None, now).await,
            status => Err(ScheduleError::InvalidState {
                id,
                status,
                action: "paused",
            }),
        }
    }

    /// Reactivates a paused rule from today on; dates missed while paused
    /// are not fired.
    #[instrument(skip(self, now))]
    pub async fn resume(&self, id: i32, now: DateTime<Utc>) -> Result<automatic_transaction::Model> {
        let rule = self.get(id).await?;
        match rule.status {
            RuleStatus::Active => Ok(rule),
            RuleStatus::Paused => {
                let pattern = rule.pattern()?;
                let next =
                    initial_next_from(rule.start_date, self.calendar.today(now), &pattern);
                let status = status_for(next, rule.end_date);
                self.set_status(rule, status, Some(next), now).await
            }
            status => Err(ScheduleError::InvalidState {
                id,
                status,
                action: "resumed",
            }),
        }
    }

    async fn set_status(
        &self,
        rule: automatic_transaction::Model,
        status: RuleStatus,
        next: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Result<automatic_transaction::Model> {
        let previous = rule.status;
        let mut active = rule.into_active_model();
        active.status = Set(status);
        if let Some(next) = next {
            active.next_execution_date = Set(next);
        }
        active.updated_at = Set(now);

        let saved = self.schedule.save(active).await?;
        info!(from = ?previous, to = ?saved.status, "Automatic transaction {} status changed", saved.id);
        Ok(saved)
    }

    /// Recomputes the next execution date of every non-terminal rule of
    /// `owner_id` from its current parameters. Used to repair schedules.
    #[instrument(skip(self, now))]
    pub async fn recalculate_for_owner(
        &self,
        owner_id: &str,
        now: DateTime<Utc>,
    ) -> Result<RecalculationReport> {
        let today = self.calendar.today(now);
        let rules = self.schedule.find_all_for_owner(owner_id).await?;
        let mut report = RecalculationReport::default();

        for rule in rules {
            if rule.status.is_terminal() {
                report.skipped += 1;
                continue;
            }

            let pattern = match rule.pattern() {
                Ok(pattern) => pattern,
                Err(e) => {
                    warn!("Automatic transaction {} has an invalid recurrence: {}", rule.id, e);
                    report
                        .errors
                        .push(format!("Automatic transaction {}: {}", rule.id, e));
                    continue;
                }
            };

            let next = initial_next_from(rule.start_date, today, &pattern);
            if next == rule.next_execution_date {
                report.unchanged += 1;
                continue;
            }

            let id = rule.id;
            let previous = rule.next_execution_date;
            let was_active = rule.status == RuleStatus::Active;
            let end_date = rule.end_date;
            let mut active = rule.into_active_model();
            active.next_execution_date = Set(next);
            if was_active {
                active.status = Set(status_for(next, end_date));
            }
            active.updated_at = Set(now);

            match self.schedule.save(active).await {
                Ok(_) => {
                    debug!(%previous, %next, "Recalculated automatic transaction {}", id);
                    report.updated += 1;
                }
                Err(e) => {
                    warn!("Failed to save automatic transaction {}: {}", id, e);
                    report
                        .errors
                        .push(format!("Automatic transaction {}: {}", id, e));
                }
            }
        }

        info!(
            updated = report.updated,
            unchanged = report.unchanged,
            skipped = report.skipped,
            failed = report.errors.len(),
            "Recalculation finished"
        );
        Ok(report)
    }

    /// Up to `count` upcoming execution dates of a rule, respecting its end date.
    pub async fn preview(&self, id: i32, count: usize) -> Result<Vec<NaiveDate>> {
        let rule = self.get(id).await?;
        if rule.status.is_terminal() {
            return Ok(Vec::new());
        }
        let pattern = rule.pattern()?;
        Ok(occurrences_from(
            rule.next_execution_date,
            rule.end_date,
            &pattern,
            count,
        ))
    }
}
