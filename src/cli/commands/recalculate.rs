use anyhow::{bail, Result};
use chrono::Utc;
use sea_orm::Database;
use tracing::{info, warn};

use crate::config::Settings;

pub async fn recalculate(settings: Settings, owner_id: &str) -> Result<()> {
    info!("Recalculating schedules for owner {}", owner_id);
    let db = Database::connect(&settings.database_url).await?;
    let service = scheduler::default_service(db, settings.calendar());

    let report = service.recalculate_for_owner(owner_id, Utc::now()).await?;
    for message in &report.errors {
        warn!("{}", message);
    }

    info!(
        "Recalculation done: {} updated, {} unchanged, {} skipped",
        report.updated, report.unchanged, report.skipped
    );
    if !report.errors.is_empty() {
        bail!("{} automatic transactions could not be recalculated", report.errors.len());
    }
    Ok(())
}
