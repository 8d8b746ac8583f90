//! Read outcomes that keep "no rows" and "query failed" apart

use tracing::{error, warn};

use crate::error::FailureKind;
use crate::traits::RepoResult;

/// Result of a read whose caller always wants a list.
///
/// [`ReadOutcome::into_rows`] never fails, while the variant still tells an
/// empty table from a failed query.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome<T> {
    Rows(Vec<T>),
    Empty,
    Failed(FailureKind),
}

impl<T> ReadOutcome<T> {
    /// Classify a repository result, logging empty and failed reads
    pub fn from_result(source: &str, result: RepoResult<Vec<T>>) -> Self {
        match result {
            Ok(rows) if rows.is_empty() => {
                warn!(source, "Query returned no data");
                Self::Empty
            }
            Ok(rows) => Self::Rows(rows),
            Err(e) => {
                error!(source, error = %e, code = e.code(), "Query failed");
                Self::Failed(e.failure_kind())
            }
        }
    }

    /// Rows, or an empty list for `Empty` and `Failed`
    pub fn into_rows(self) -> Vec<T> {
        match self {
            Self::Rows(rows) => rows,
            Self::Empty | Self::Failed(_) => Vec::new(),
        }
    }

    pub fn failure(&self) -> Option<FailureKind> {
        match self {
            Self::Failed(kind) => Some(*kind),
            _ => None,
        }
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}
