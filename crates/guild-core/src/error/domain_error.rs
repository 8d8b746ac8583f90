//! Domain errors - error types for the domain layer

use std::fmt;

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Store Errors
    // =========================================================================
    #[error("Store unreachable: {0}")]
    Connectivity(String),

    #[error("Integrity violation: {0}")]
    Integrity(String),

    #[error("Database error: {0}")]
    Database(String),

    // =========================================================================
    // Data Errors
    // =========================================================================
    #[error("Unexpected data shape: {0}")]
    DataShape(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // =========================================================================
    // Other
    // =========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Error code string for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::Connectivity(_) => "STORE_UNREACHABLE",
            Self::Integrity(_) => "INTEGRITY_VIOLATION",
            Self::Database(_) => "DATABASE_ERROR",
            Self::DataShape(_) => "DATA_SHAPE",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if the store could not be reached or stopped answering
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity(_))
    }

    /// Check if a constraint rejected the write
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity(_))
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Classification used by run reports and exit codes.
    ///
    /// Generic database failures count as connectivity: the query did not
    /// produce data, and a later run may succeed.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Integrity(_) => FailureKind::Integrity,
            Self::DataShape(_) | Self::Validation(_) | Self::NotFound(_) => FailureKind::DataShape,
            Self::Connectivity(_) | Self::Database(_) | Self::Internal(_) => {
                FailureKind::Connectivity
            }
        }
    }
}

/// Typed failure classes carried by outcomes and run reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Store or roster source unavailable
    Connectivity,
    /// Constraint violation in the store
    Integrity,
    /// Source or store data did not have the expected shape
    DataShape,
    /// Sink target (spreadsheet) missing or inaccessible
    SinkTargetNotFound,
    /// View (worksheet) missing inside an existing target
    SinkViewNotFound,
    /// Any other sink API failure
    Sink,
}

impl FailureKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connectivity => "connectivity",
            Self::Integrity => "integrity",
            Self::DataShape => "data_shape",
            Self::SinkTargetNotFound => "sink_target_not_found",
            Self::SinkViewNotFound => "sink_view_not_found",
            Self::Sink => "sink",
        }
    }

    /// Data-shape failures from the roster source are handled like
    /// connectivity: log and skip the guild.
    pub const fn is_connectivity_class(self) -> bool {
        matches!(self, Self::Connectivity | Self::DataShape)
    }

    pub const fn is_sink(self) -> bool {
        matches!(
            self,
            Self::SinkTargetNotFound | Self::SinkViewNotFound | Self::Sink
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
