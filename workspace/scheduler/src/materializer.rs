use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use model::entities::automatic_transaction::{self, RuleStatus};
use tracing::{debug, info, instrument, warn};

use crate::calendar::Calendar;
use crate::error::{MaterializationError, MaterializationErrorKind};
use crate::recurrence::next_from;
use crate::store::{NewOccurrence, RuleAdvance, ScheduleStore, TransactionStore};

/// Result of firing one rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub rule_id: i32,
    /// The generated transaction.
    pub occurrence_id: i32,
    pub occurrence_date: NaiveDate,
    /// The execution date that was consumed by this firing.
    pub previous_execution_date: NaiveDate,
    pub next_execution_date: NaiveDate,
    pub status: RuleStatus,
    pub execution_count: i32,
}

/// Turns one due rule into a transaction and moves its schedule forward.
pub struct Materializer {
    schedule: Arc<dyn ScheduleStore>,
    transactions: Arc<dyn TransactionStore>,
    calendar: Calendar,
}

impl Materializer {
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

    /// Fires `rule` once at `now`.
    ///
    /// The transaction is written before the rule is advanced. A crash between
    /// the two writes leaves the rule due, so the next pass produces a visible
    /// duplicate instead of silently skipping an occurrence.
    ///
    /// The rule is re-read first and the advance is conditional on the
    /// execution date that was read; if another pass got there first the
    /// firing is reported as a conflict.
    #[instrument(skip(self, rule, now), fields(rule_id = rule.id, next = %rule.next_execution_date))]
    pub async fn materialize(
        &self,
        rule: &automatic_transaction::Model,
        now: DateTime<Utc>,
    ) -> Result<Outcome, MaterializationError> {
        let rule_id = rule.id;
        let expected = rule.next_execution_date;
        let fail = |kind: MaterializationErrorKind| MaterializationError::new(rule_id, kind);

        let current = match self
            .schedule
            .find_by_id(rule_id)
            .await
            .map_err(|e| fail(e.into()))?
        {
            Some(current)
                if current.status == RuleStatus::Active
                    && current.next_execution_date == expected =>
            {
                current
            }
            other => {
                warn!(
                    status = ?other.as_ref().map(|r| r.status),
                    "Rule changed before firing, skipping"
                );
                return Err(fail(MaterializationErrorKind::Conflict {
                    expected,
                    occurrence_id: None,
                }));
            }
        };

        let pattern = current.pattern().map_err(|e| fail(e.into()))?;
        let today = self.calendar.today(now);
        let candidate = next_from(expected, &pattern);

        let status = match current.end_date {
            Some(end) if candidate > end => {
                debug!(%candidate, %end, "Next occurrence falls after end date, completing rule");
                RuleStatus::Completed
            }
            _ => RuleStatus::Active,
        };

        let occurrence = self
            .transactions
            .create(NewOccurrence::from_rule(&current, today, now))
            .await
            .map_err(|e| fail(e.into()))?;

        let execution_count = current.execution_count.saturating_add(1);
        let advanced = self
            .schedule
            .advance(
                rule_id,
                expected,
                RuleAdvance {
                    next_execution_date: candidate,
                    status,
                    execution_count,
                    last_executed: now,
                },
            )
            .await
            .map_err(|e| fail(e.into()))?;

        if !advanced {
            warn!(
                occurrence_id = occurrence.id,
                "Rule was advanced concurrently after its transaction was written"
            );
            return Err(fail(MaterializationErrorKind::Conflict {
                expected,
                occurrence_id: Some(occurrence.id),
            }));
        }

        info!(
            occurrence_id = occurrence.id,
            next = %candidate,
            ?status,
            "Materialized automatic transaction"
        );

        Ok(Outcome {
            rule_id,
            occurrence_id: occurrence.id,
            occurrence_date: today,
            previous_execution_date: expected,
            next_execution_date: candidate,
            status,
            execution_count,
        })
    }
}
