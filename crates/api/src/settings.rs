//! Server Settings
//!
//! Layered configuration: built-in defaults, then an optional
//! `sleeplog.toml`, then `SLEEPLOG__SECTION__KEY` environment variables.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::rate_limit::RateLimitConfig;

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "sleeplog.toml";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "SLEEPLOG";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Listen address
    pub addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// sqlx SQLite URL
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    /// Only send the session cookie over HTTPS
    pub secure: bool,
    /// Inactivity window before a session expires
    pub expiry_days: i64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            secure: false,
            expiry_days: 14,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub level: String,
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub session: SessionSettings,
    pub log: LogSettings,
    pub rate_limit: RateLimitConfig,
}

impl Settings {
    /// Load from defaults, `sleeplog.toml` and the environment
    pub fn load() -> Result<Self, ConfigError> {
        defaults()?
            .add_source(
                File::with_name(CONFIG_FILE)
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Load from defaults overlaid with an inline TOML document
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = RateLimitConfig::default();
    Config::builder()
        .set_default("server.addr", "127.0.0.1:8000")?
        .set_default("database.url", "sqlite://sleeplog.db")?
        .set_default("database.max_connections", 5_i64)?
        .set_default("session.secure", false)?
        .set_default("session.expiry_days", 14_i64)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?
        .set_default("rate_limit.enabled", defaults.enabled)?
        .set_default("rate_limit.per_second", defaults.per_second as i64)?
        .set_default("rate_limit.burst_size", defaults.burst_size as i64)
}
