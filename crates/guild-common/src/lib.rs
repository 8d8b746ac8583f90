//! # guild-common
//!
//! Shared utilities including configuration, error handling, exit codes, and telemetry.

pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, AppSettings, ConfigError, DatabaseConfig, Environment, RosterConfig, SinkConfig,
    SourceConfig, TicketConfig,
};
pub use error::{AppError, AppResult, ExitStatus};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
