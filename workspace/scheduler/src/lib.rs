pub mod batch;
pub mod calendar;
pub mod error;
pub mod materializer;
pub mod recurrence;
pub mod service;
pub mod store;

#[cfg(test)]
pub mod testing;

use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;

pub use batch::{BatchProcessor, BatchResult};
pub use calendar::Calendar;
pub use materializer::{Materializer, Outcome};
pub use service::{AutomaticTransactionService, NewRule, RecalculationReport, RuleUpdate};
pub use store::{ScheduleStore, SeaOrmScheduleStore, SeaOrmTransactionStore, TransactionStore};

/// Returns a batch processor wired to the SeaORM stores, the way the cron
/// endpoint and the CLI use it.
pub fn default_processor(
    db: DatabaseConnection,
    calendar: Calendar,
    rule_timeout: Option<Duration>,
) -> BatchProcessor {
    let processor = BatchProcessor::new(
        Arc::new(SeaOrmScheduleStore::new(db.clone())),
        Arc::new(SeaOrmTransactionStore::new(db)),
        calendar,
    );

    match rule_timeout {
        Some(timeout) => processor.with_rule_timeout(timeout),
        None => processor,
    }
}

/// Returns the lifecycle service wired to the SeaORM stores.
pub fn default_service(db: DatabaseConnection, calendar: Calendar) -> AutomaticTransactionService {
    AutomaticTransactionService::new(
        Arc::new(SeaOrmScheduleStore::new(db.clone())),
        Arc::new(SeaOrmTransactionStore::new(db)),
        calendar,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use model::entities::automatic_transaction::{RecurrenceType, RuleStatus};
    use testing::{insert_rule, setup_db, RuleSeed};

    /// Runs the default processor three days in a row against a daily rule and
    /// checks the schedule walks forward one day per pass.
    #[tokio::test]
    async fn test_default_processor_daily_rule() {
        let db = setup_db().await.unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let rule = insert_rule(
            &db,
            RuleSeed::new(RecurrenceType::Daily, 1).starting(start),
        )
        .await
        .unwrap();

        let processor = default_processor(db.clone(), Calendar::utc(), Some(Duration::from_secs(5)));
        for day in 1..=3 {
            let now = Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap();
            let result = processor.run_once(now).await.unwrap();
            assert_eq!(result.processed_count, 1, "day {}", day);
            assert!(result.errors.is_empty());
        }

        let service = default_service(db, Calendar::utc());
        let rule = service.get(rule.id).await.unwrap();
        assert_eq!(rule.execution_count, 3);
        assert_eq!(rule.status, RuleStatus::Active);
        assert_eq!(rule.next_execution_date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        assert_eq!(service.occurrences(rule.id).await.unwrap().len(), 3);
    }
}
