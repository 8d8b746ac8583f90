//! Sink errors

use guild_core::FailureKind;
use thiserror::Error;

/// Failure classes distinguished at the sink boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkFailureKind {
    /// The target (spreadsheet) does not exist or is not shared with us
    TargetNotFound,
    /// The target exists but has no view (worksheet) of that name
    ViewNotFound,
    /// Any other sink exception
    Api,
}

impl SinkFailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TargetNotFound => "target_not_found",
            Self::ViewNotFound => "view_not_found",
            Self::Api => "api",
        }
    }
}

impl std::fmt::Display for SinkFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SinkFailureKind> for FailureKind {
    fn from(kind: SinkFailureKind) -> Self {
        match kind {
            SinkFailureKind::TargetNotFound => Self::SinkTargetNotFound,
            SinkFailureKind::ViewNotFound => Self::SinkViewNotFound,
            SinkFailureKind::Api => Self::Sink,
        }
    }
}

/// Errors raised by sink clients
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Sink target not found: {0}")]
    TargetNotFound(String),

    #[error("View {view} not found in sink target {target}")]
    ViewNotFound { target: String, view: String },

    #[error("Sink request failed: {0}")]
    Api(String),

    /// Token exchange failed
    #[error("Sink authentication failed: {0}")]
    Auth(String),

    /// Unreadable or malformed service account credentials
    #[error("Invalid sink credentials: {0}")]
    Credentials(String),
}

impl SinkError {
    pub fn kind(&self) -> SinkFailureKind {
        match self {
            Self::TargetNotFound(_) => SinkFailureKind::TargetNotFound,
            Self::ViewNotFound { .. } => SinkFailureKind::ViewNotFound,
            Self::Api(_) | Self::Auth(_) | Self::Credentials(_) => SinkFailureKind::Api,
        }
    }
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;
