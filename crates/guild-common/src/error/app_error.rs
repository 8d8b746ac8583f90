//! Application error types
//!
//! Errors that abort a job before or outside its per-guild loop. Failures
//! inside the loop are recorded in the run report instead.

use guild_core::DomainError;

use crate::config::ConfigError;
use crate::error::ExitStatus;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    // Telemetry setup
    #[error("Telemetry error: {0}")]
    Telemetry(String),

    // Sink credentials could not be loaded
    #[error("Credentials error: {0}")]
    Credentials(String),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    /// Get the process exit status for this error
    #[must_use]
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            Self::Config(_) | Self::Credentials(_) => ExitStatus::Config,
            Self::Domain(e) if e.is_integrity() => ExitStatus::Integrity,
            Self::Domain(_) => ExitStatus::Connectivity,
            Self::Telemetry(_) | Self::Internal(_) => ExitStatus::Unexpected,
        }
    }

    /// Get error code for logs
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Telemetry(_) => "TELEMETRY_ERROR",
            Self::Credentials(_) => "CREDENTIALS_ERROR",
            Self::Domain(e) => e.code(),
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
