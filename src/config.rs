use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use config::{Config, ConfigError, Environment, File};
use scheduler::Calendar;
use sea_orm::Database;
use serde::Deserialize;

use crate::schemas::AppState;

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Shared secret the cron trigger must present as a Bearer token.
    /// The processing endpoint is open when unset.
    #[serde(default)]
    pub cron_secret: Option<String>,
    pub request_timeout_secs: u64,
}

/// Scheduling engine settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSettings {
    /// Upper bound for firing one rule; 0 disables the bound.
    pub rule_timeout_secs: u64,
    /// Offset of the canonical calendar from UTC, in minutes.
    pub utc_offset_minutes: i32,
}

/// Application settings.
///
/// Layered as: built-in defaults, then an optional `autotx.toml` (or any
/// other format `config` understands) in the working directory, then
/// `AUTOTX__*` environment variables (`AUTOTX__SCHEDULER__RULE_TIMEOUT_SECS`).
/// `DATABASE_URL` and `BIND_ADDRESS` win over everything else.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    pub server: ServerSettings,
    pub scheduler: SchedulerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://autotx.db?mode=rwc".to_string(),
            bind_address: "0.0.0.0:3000".to_string(),
            server: ServerSettings {
                cron_secret: None,
                request_timeout_secs: 30,
            },
            scheduler: SchedulerSettings {
                rule_timeout_secs: 30,
                utc_offset_minutes: 0,
            },
        }
    }
}

impl Settings {
    /// Loads the settings from the environment and the optional config file.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let defaults = Settings::default();

        Config::builder()
            .set_default("database_url", defaults.database_url)?
            .set_default("bind_address", defaults.bind_address)?
            .set_default(
                "server.request_timeout_secs",
                defaults.server.request_timeout_secs,
            )?
            .set_default(
                "scheduler.rule_timeout_secs",
                defaults.scheduler.rule_timeout_secs,
            )?
            .set_default(
                "scheduler.utc_offset_minutes",
                defaults.scheduler.utc_offset_minutes,
            )?
            .add_source(File::with_name("autotx").required(false))
            .add_source(
                Environment::with_prefix("AUTOTX")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database_url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("bind_address", std::env::var("BIND_ADDRESS").ok())?
            .build()?
            .try_deserialize()
    }

    pub fn calendar(&self) -> Calendar {
        Calendar::with_offset_minutes(self.scheduler.utc_offset_minutes)
    }

    pub fn rule_timeout(&self) -> Option<Duration> {
        match self.scheduler.rule_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

/// Connect to the configured database and build the application state
pub async fn initialize_app_state(settings: Settings) -> Result<AppState> {
    tracing::info!("Connecting to database: {}", settings.database_url);
    let db = Database::connect(&settings.database_url).await?;

    Ok(AppState::new(db, Arc::new(settings)))
}
