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
    /// Screenshot storage configuration.
    pub storage: StorageConfig,
    /// Admin authentication configuration.
    pub auth: AuthConfig,
    /// Event branding and fallbacks.
    pub event: EventConfig,
    /// Notification outbox configuration.
    pub outbox: OutboxConfig,
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
    /// Public URL of this deployment.
    pub url: String,
    /// Interval between reconciliation events pushed to admin consoles.
    #[serde(default = "default_reconcile_interval")]
    pub reconcile_interval_secs: u64,
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

/// Screenshot storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Base path for stored files.
    #[serde(default = "default_storage_path")]
    pub base_path: String,
    /// Base URL for serving stored files.
    #[serde(default = "default_storage_url")]
    pub base_url: String,
}

/// Admin authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Session lifetime in minutes.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_minutes: i64,
}

/// Event branding and fallbacks.
#[derive(Debug, Clone, Deserialize)]
pub struct EventConfig {
    /// Event name used in email templates.
    #[serde(default = "default_event_name")]
    pub name: String,
    /// Group invitation link used when the store lookup itself fails.
    #[serde(default)]
    pub fallback_group_link: Option<String>,
}

/// Notification outbox configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OutboxConfig {
    /// Interval between outbox polls.
    #[serde(default = "default_outbox_poll")]
    pub poll_interval_secs: u64,
    /// Delivery attempts before an intent is marked failed.
    #[serde(default = "default_outbox_attempts")]
    pub max_attempts: i32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_reconcile_interval() -> u64 {
    30
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

fn default_storage_path() -> String {
    "./files".to_string()
}

fn default_storage_url() -> String {
    "/files".to_string()
}

const fn default_session_ttl() -> i64 {
    12 * 60
}

fn default_event_name() -> String {
    "TechSprint 2K26".to_string()
}

const fn default_outbox_poll() -> u64 {
    5
}

const fn default_outbox_attempts() -> i32 {
    3
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `TECHSPRINT_ENV`)
    /// 3. Environment variables with `TECHSPRINT` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("TECHSPRINT_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TECHSPRINT")
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
                config::Environment::with_prefix("TECHSPRINT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
