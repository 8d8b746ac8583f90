//! Roster source errors

use guild_core::FailureKind;
use thiserror::Error;

/// Errors raised while fetching or decoding a guild roster
#[derive(Debug, Error)]
pub enum SourceError {
    /// Connection failure, timeout, or interrupted body
    #[error("Roster request failed: {0}")]
    Transport(String),

    #[error("Roster source answered with status {0}")]
    Status(u16),

    #[error("Failed to decode roster: {0}")]
    Decode(String),

    #[error("Roster member {member} has no {field}")]
    MissingField { member: String, field: String },

    #[error("Invalid roster source setup: {0}")]
    Setup(String),
}

impl SourceError {
    /// Classification for run reports: transport problems are connectivity,
    /// malformed payloads are data-shape failures.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) | Self::Status(_) | Self::Setup(_) => FailureKind::Connectivity,
            Self::Decode(_) | Self::MissingField { .. } => FailureKind::DataShape,
        }
    }
}

/// Result type for roster source operations
pub type SourceResult<T> = Result<T, SourceError>;
