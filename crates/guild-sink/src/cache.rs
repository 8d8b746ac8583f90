//! Per-run sink read cache
//!
//! Every call to the sink goes through one [`Throttle`]. Reads are memoized
//! per `(target, view)` for the lifetime of the cache, failed reads
//! included, so a view is fetched at most once per run unless invalidated.

use std::collections::HashMap;

use tracing::{info, instrument, warn};

use guild_core::value_objects::Cell;

use crate::client::{SheetClient, SheetTable};
use crate::error::{SinkFailureKind, SinkResult};
use crate::throttle::Throttle;

type CacheKey = (String, String);

pub struct SinkCache<'a> {
    client: &'a dyn SheetClient,
    throttle: Throttle,
    entries: HashMap<CacheKey, Result<SheetTable, SinkFailureKind>>,
}

impl<'a> SinkCache<'a> {
    pub fn new(client: &'a dyn SheetClient, throttle: Throttle) -> Self {
        Self {
            client,
            throttle,
            entries: HashMap::new(),
        }
    }

    fn key(target: &str, view: &str) -> CacheKey {
        (target.to_owned(), view.to_owned())
    }

    /// Cached content of a view, fetching it on first use.
    ///
    /// Returns `None` when the fetch failed; see [`SinkCache::failure`].
    #[instrument(skip(self))]
    pub async fn get_cached(&mut self, target: &str, view: &str) -> Option<&SheetTable> {
        let key = Self::key(target, view);
        if !self.entries.contains_key(&key) {
            self.throttle.acquire().await;
            info!(view, "Fetching view content");
            let fetched = self.client.read_all(target, view).await.map_err(|e| {
                warn!(view, error = %e, "Failed to fetch view content");
                e.kind()
            });
            self.entries.insert(key.clone(), fetched);
        }
        self.entries.get(&key).and_then(|entry| entry.as_ref().ok())
    }

    /// Memoized failure of an earlier fetch
    pub fn failure(&self, target: &str, view: &str) -> Option<SinkFailureKind> {
        match self.entries.get(&Self::key(target, view)) {
            Some(Err(kind)) => Some(*kind),
            _ => None,
        }
    }

    pub fn invalidate(&mut self, target: &str, view: &str) {
        self.entries.remove(&Self::key(target, view));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Throttled range clear
    pub async fn clear_range(&mut self, target: &str, view: &str, range: &str) -> SinkResult<()> {
        self.throttle.acquire().await;
        self.client.clear_range(target, view, range).await
    }

    /// Throttled range write
    pub async fn write_range(
        &mut self,
        target: &str,
        view: &str,
        range: &str,
        rows: &[Vec<Cell>],
    ) -> SinkResult<()> {
        self.throttle.acquire().await;
        self.client.write_range(target, view, range, rows).await
    }
}
