//! View synchronization
//!
//! Fresh rows are compared with the cached view content and written only
//! when they differ. A write is one range clear followed by one range write.

use tracing::{debug, error, info, instrument, warn};

use guild_core::value_objects::Cell;

use crate::cache::SinkCache;
use crate::error::SinkFailureKind;
use crate::table::{data_rows, same_content};

/// Result of synchronizing one view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Written,
    /// Sink already showed these rows
    Skipped,
    Failed(SinkFailureKind),
}

impl SyncOutcome {
    pub fn failure(self) -> Option<SinkFailureKind> {
        match self {
            Self::Failed(kind) => Some(kind),
            _ => None,
        }
    }
}

/// Bring `range` of a view in line with `new_rows`.
///
/// Without a cached baseline (the read failed) the write is attempted
/// unconditionally. Failures are logged and returned, never raised.
#[instrument(skip(cache, new_rows), fields(rows = new_rows.len()))]
pub async fn sync(
    cache: &mut SinkCache<'_>,
    target: &str,
    view: &str,
    range: &str,
    new_rows: &[Vec<Cell>],
) -> SyncOutcome {
    let unchanged = match cache.get_cached(target, view).await {
        Some(table) => same_content(&data_rows(table), new_rows),
        None => {
            debug!(
                failure = ?cache.failure(target, view),
                "No baseline for view, writing unconditionally"
            );
            false
        }
    };

    if unchanged {
        info!("View is up to date, skipping write");
        return SyncOutcome::Skipped;
    }

    info!("Writing view");
    if let Err(e) = cache.clear_range(target, view, range).await {
        return report(e.kind(), &e);
    }
    if let Err(e) = cache.write_range(target, view, range, new_rows).await {
        return report(e.kind(), &e);
    }

    cache.invalidate(target, view);
    SyncOutcome::Written
}

fn report(kind: SinkFailureKind, e: &dyn std::error::Error) -> SyncOutcome {
    match kind {
        SinkFailureKind::TargetNotFound => warn!(error = %e, "Sink target is non-existent or inaccessible"),
        SinkFailureKind::ViewNotFound => warn!(error = %e, "View is non-existent or inaccessible"),
        SinkFailureKind::Api => error!(error = ?e, "Sink write failed"),
    }
    SyncOutcome::Failed(kind)
}
