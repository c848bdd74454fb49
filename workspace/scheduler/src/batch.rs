use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use model::entities::automatic_transaction;
use tracing::{error, info, instrument, warn};

use crate::calendar::Calendar;
use crate::error::{BatchError, MaterializationError, MaterializationErrorKind};
use crate::materializer::{Materializer, Outcome};
use crate::store::{ScheduleStore, TransactionStore};

/// Aggregate result of one processing pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    /// Rules fired successfully.
    pub processed_count: usize,
    /// One message per failed rule, each naming the rule id.
    pub errors: Vec<String>,
    pub outcomes: Vec<Outcome>,
}

impl BatchResult {
    /// The result reported when the pass could not start at all.
    pub fn aborted(error: &BatchError) -> Self {
        Self {
            processed_count: 0,
            errors: vec![error.to_string()],
            outcomes: Vec::new(),
        }
    }
}

/// Runs one pass over every due rule.
///
/// Rules are fired sequentially and independently: a failing rule is recorded
/// and the pass moves on. Two overlapping passes are not locked out against
/// each other; the materializer's conditional writes report the loser as a
/// conflict instead.
pub struct BatchProcessor {
    schedule: Arc<dyn ScheduleStore>,
    materializer: Materializer,
    calendar: Calendar,
    rule_timeout: Option<Duration>,
}

impl BatchProcessor {
    pub fn new(
        schedule: Arc<dyn ScheduleStore>,
        transactions: Arc<dyn TransactionStore>,
        calendar: Calendar,
    ) -> Self {
        Self {
            materializer: Materializer::new(schedule.clone(), transactions, calendar),
            schedule,
            calendar,
            rule_timeout: None,
        }
    }

    /// Bounds the time spent on a single rule; expiry counts as that rule's error.
    pub fn with_rule_timeout(mut self, timeout: Duration) -> Self {
        self.rule_timeout = Some(timeout);
        self
    }

    /// Processes every rule due at `now`.
    ///
    /// Only a failure to list the due rules is returned as an error.
    #[instrument(skip(self), fields(today = tracing::field::Empty))]
    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<BatchResult, BatchError> {
        let today = self.calendar.today(now);
        tracing::Span::current().record("today", tracing::field::display(today));

        let due = self.schedule.find_due(today).await.map_err(|e| {
            error!("Failed to fetch due automatic transactions: {}", e);
            BatchError::FetchDue(e)
        })?;
        info!("Processing {} due automatic transactions", due.len());

        let mut result = BatchResult::default();
        for rule in &due {
            match self.fire(rule, now).await {
                Ok(outcome) => {
                    result.processed_count += 1;
                    result.outcomes.push(outcome);
                }
                Err(e) => {
                    if e.is_conflict() {
                        warn!("{}", e);
                    } else {
                        error!("{}", e);
                    }
                    result.errors.push(e.to_string());
                }
            }
        }

        info!(
            processed = result.processed_count,
            failed = result.errors.len(),
            "Batch pass finished"
        );
        Ok(result)
    }

    async fn fire(
        &self,
        rule: &automatic_transaction::Model,
        now: DateTime<Utc>,
    ) -> Result<Outcome, MaterializationError> {
        let Some(limit) = self.rule_timeout else {
            return self.materializer.materialize(rule, now).await;
        };

        tokio::time::timeout(limit, self.materializer.materialize(rule, now))
            .await
            .unwrap_or_else(|_| {
                Err(MaterializationError::new(
                    rule.id,
                    MaterializationErrorKind::Timeout(limit),
                ))
            })
    }
}
