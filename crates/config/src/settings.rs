use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

/// Verification side of the external identity provider's tokens.
#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    /// Upper bound on the values of a single `$in` filter.
    pub query_batch_size: usize,
    pub schedule_window_days: u32,
    pub message_limit: u32,
    pub activity_limit: u32,
    pub metrics_lookback_days: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            query_batch_size: 10,
            schedule_window_days: 7,
            message_limit: 3,
            activity_limit: 10,
            metrics_lookback_days: 30,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = DashboardSettings::default();
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("ROSTERLINE"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 3000)?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "rosterline")?
            .set_default("jwt.secret", "change-me-in-production")?
            .set_default("jwt.issuer", "rosterline")?
            .set_default("dashboard.query_batch_size", defaults.query_batch_size as i64)?
            .set_default("dashboard.schedule_window_days", defaults.schedule_window_days as i64)?
            .set_default("dashboard.message_limit", defaults.message_limit as i64)?
            .set_default("dashboard.activity_limit", defaults.activity_limit as i64)?
            .set_default("dashboard.metrics_lookback_days", defaults.metrics_lookback_days as i64)?
            .build()?;

        config.try_deserialize()
    }
}
