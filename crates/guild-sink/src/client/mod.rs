//! Sink clients
//!
//! A sink target is a spreadsheet addressed by name; each view is one of its
//! worksheets. Ranges are A1 ranges relative to the view.

pub mod auth;
pub mod google;

use async_trait::async_trait;

use guild_core::value_objects::Cell;

use crate::error::SinkResult;

pub use auth::{ServiceAccountKey, TokenSource};
pub use google::GoogleSheetsClient;

/// Full content of one view, header row included
pub type SheetTable = Vec<Vec<Cell>>;

/// Operations a spreadsheet sink must support
#[async_trait]
pub trait SheetClient: Send + Sync {
    /// Read every populated cell of a view as unformatted values
    async fn read_all(&self, target: &str, view: &str) -> SinkResult<SheetTable>;

    /// Blank out `range` of a view
    async fn clear_range(&self, target: &str, view: &str, range: &str) -> SinkResult<()>;

    /// Write `rows` starting at the top-left corner of `range`
    async fn write_range(
        &self,
        target: &str,
        view: &str,
        range: &str,
        rows: &[Vec<Cell>],
    ) -> SinkResult<()>;
}
