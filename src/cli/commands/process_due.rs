use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use scheduler::calendar::{parse_date_only, Calendar};
use sea_orm::Database;
use tracing::{error, info, warn};

use crate::config::Settings;

/// Resolves the instant a pass runs at: an explicit `--date` maps to the
/// start of that day in the canonical calendar, otherwise `--now` or the clock.
pub fn processing_instant(
    calendar: &Calendar,
    now: Option<DateTime<Utc>>,
    date: Option<&str>,
) -> Result<DateTime<Utc>> {
    match (date, now) {
        (Some(date), _) => Ok(calendar.midnight(parse_date_only(date)?)),
        (None, Some(now)) => Ok(now),
        (None, None) => Ok(Utc::now()),
    }
}

/// One processing pass from the command line. Exits with an error when the
/// pass could not start or any rule failed, so cron can alert on it.
pub async fn process_due(settings: Settings, now: DateTime<Utc>) -> Result<()> {
    info!(
        day_start = %settings.calendar().normalize_to_midnight(now),
        "Processing due automatic transactions at {}",
        now
    );
    let db = Database::connect(&settings.database_url).await?;
    let processor =
        scheduler::default_processor(db, settings.calendar(), settings.rule_timeout());

    let result = match processor.run_once(now).await {
        Ok(result) => result,
        Err(e) => {
            error!("Processing pass aborted: {}", e);
            return Err(e.into());
        }
    };

    for outcome in &result.outcomes {
        info!(
            "Automatic transaction {} -> transaction {} on {}, next {} ({:?})",
            outcome.rule_id,
            outcome.occurrence_id,
            outcome.occurrence_date,
            outcome.next_execution_date,
            outcome.status
        );
    }
    for message in &result.errors {
        warn!("{}", message);
    }

    info!(
        "Processed {} automatic transactions, {} failed",
        result.processed_count,
        result.errors.len()
    );
    if !result.errors.is_empty() {
        bail!("{} automatic transactions failed", result.errors.len());
    }
    Ok(())
}
