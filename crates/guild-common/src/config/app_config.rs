//! Application configuration structs
//!
//! Loads configuration from environment variables, with a `.env` file as
//! fallback. Every setting is validated up front so that a bad value aborts
//! the job before any I/O happens.

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub source: SourceConfig,
    pub sink: SinkConfig,
    pub roster: RosterConfig,
    pub tickets: TicketConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// Roster source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Endpoint of the guild roster API; only some jobs need it
    pub url: Option<String>,
    #[serde(default = "default_source_timeout")]
    pub timeout_secs: u64,
    /// Raid whose results are copied onto members
    #[serde(default = "default_raid_id")]
    pub raid_id: String,
}

/// Presentation sink configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SinkConfig {
    /// Service account key file
    pub credentials_path: Option<String>,
    #[serde(default = "default_calls_per_minute")]
    pub calls_per_minute: u32,
}

/// Roster reconciliation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RosterConfig {
    /// Removals are suppressed when the live roster is smaller than this
    /// fraction of the persisted one
    #[serde(default = "default_min_live_ratio")]
    pub min_live_ratio: f64,
}

/// Daily ticket tracking configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TicketConfig {
    #[serde(default = "default_daily_quota")]
    pub daily_quota: i64,
    /// `memberContribution` entry type carrying today's tickets
    #[serde(default = "default_contribution_type")]
    pub contribution_type: i64,
    /// Minutes before reset during which tickets are logged
    #[serde(default = "default_reset_window")]
    pub reset_window_minutes: i64,
}

// Default value functions
fn default_app_name() -> String {
    "guild-sync".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_source_timeout() -> u64 {
    30
}

fn default_raid_id() -> String {
    "order66".to_string()
}

fn default_calls_per_minute() -> u32 {
    60
}

fn default_min_live_ratio() -> f64 {
    0.5
}

fn default_daily_quota() -> i64 {
    600
}

fn default_contribution_type() -> i64 {
    2
}

fn default_reset_window() -> i64 {
    2
}

/// Parse an optional variable, falling back to `default` when unset
fn parse_or<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        None => Ok(default),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or any value is invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let config = Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: non_empty("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                connect_timeout_secs: parse_or(
                    &lookup,
                    "DATABASE_CONNECT_TIMEOUT_SECS",
                    default_connect_timeout(),
                )?,
            },
            source: SourceConfig {
                url: non_empty("GUILD_URL"),
                timeout_secs: parse_or(&lookup, "SOURCE_TIMEOUT_SECS", default_source_timeout())?,
                raid_id: non_empty("RAID_ID").unwrap_or_else(default_raid_id),
            },
            sink: SinkConfig {
                credentials_path: non_empty("SHEETS_CREDENTIALS_PATH"),
                calls_per_minute: parse_or(
                    &lookup,
                    "SINK_CALLS_PER_MINUTE",
                    default_calls_per_minute(),
                )?,
            },
            roster: RosterConfig {
                min_live_ratio: parse_or(&lookup, "ROSTER_MIN_LIVE_RATIO", default_min_live_ratio())?,
            },
            tickets: TicketConfig {
                daily_quota: parse_or(&lookup, "DAILY_TICKET_QUOTA", default_daily_quota())?,
                contribution_type: parse_or(
                    &lookup,
                    "TICKET_CONTRIBUTION_TYPE",
                    default_contribution_type(),
                )?,
                reset_window_minutes: parse_or(
                    &lookup,
                    "RESET_WINDOW_MINUTES",
                    default_reset_window(),
                )?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "DATABASE_CONNECT_TIMEOUT_SECS",
                "0".to_string(),
            ));
        }
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("SOURCE_TIMEOUT_SECS", "0".to_string()));
        }
        if self.sink.calls_per_minute == 0 {
            return Err(ConfigError::InvalidValue("SINK_CALLS_PER_MINUTE", "0".to_string()));
        }
        if !(0.0..=1.0).contains(&self.roster.min_live_ratio) {
            return Err(ConfigError::InvalidValue(
                "ROSTER_MIN_LIVE_RATIO",
                self.roster.min_live_ratio.to_string(),
            ));
        }
        if self.tickets.reset_window_minutes < 0 {
            return Err(ConfigError::InvalidValue(
                "RESET_WINDOW_MINUTES",
                self.tickets.reset_window_minutes.to_string(),
            ));
        }
        Ok(())
    }

    /// Roster source endpoint, required by the jobs that call the source
    pub fn require_guild_url(&self) -> Result<&str, ConfigError> {
        self.source
            .url
            .as_deref()
            .ok_or(ConfigError::MissingVar("GUILD_URL"))
    }

    /// Service account key file, required by the sink push job
    pub fn require_credentials_path(&self) -> Result<&str, ConfigError> {
        self.sink
            .credentials_path
            .as_deref()
            .ok_or(ConfigError::MissingVar("SHEETS_CREDENTIALS_PATH"))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
