//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Moderation pipeline configuration.
    #[serde(default)]
    pub moderation: ModerationConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Moderation pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ModerationConfig {
    /// Hours a report may sit without moderator attention before
    /// automatic escalation applies.
    #[serde(default = "default_sla_hours")]
    pub sla_hours: i64,
    /// Interval between escalation sweeps, in seconds.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// Maximum number of overdue reports processed per sweep.
    #[serde(default = "default_sweep_batch_size")]
    pub sweep_batch_size: u64,
    /// Timeout applied to each store call made by the sweep, in seconds.
    #[serde(default = "default_store_timeout_secs")]
    pub store_timeout_secs: u64,
    /// Shared secret for the HTTP escalation trigger. When unset, the
    /// trigger requires a moderator bearer token instead.
    #[serde(default)]
    pub scheduler_secret: Option<String>,
    /// Webhook URL for moderator notifications. When unset, notifications
    /// are emitted to the log only.
    #[serde(default)]
    pub notify_webhook_url: Option<String>,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            sla_hours: default_sla_hours(),
            sweep_interval_secs: default_sweep_interval_secs(),
            sweep_batch_size: default_sweep_batch_size(),
            store_timeout_secs: default_store_timeout_secs(),
            scheduler_secret: None,
            notify_webhook_url: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_sla_hours() -> i64 {
    24
}

const fn default_sweep_interval_secs() -> u64 {
    300
}

const fn default_sweep_batch_size() -> u64 {
    50
}

const fn default_store_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `TRADEPOST_ENV`)
    /// 3. Environment variables with `TRADEPOST_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("TRADEPOST_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TRADEPOST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("TRADEPOST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
