//! # Guild Sink
//!
//! Publishes computed views to spreadsheet sinks. Reads are cached per run,
//! all calls share one throttle, and a view is rewritten only when its
//! content changed.

pub mod cache;
pub mod client;
pub mod directive;
pub mod error;
pub mod sync;
pub mod table;
pub mod throttle;

pub use cache::SinkCache;
pub use client::{GoogleSheetsClient, SheetClient, SheetTable};
pub use directive::{read_directives, Directives};
pub use error::{SinkError, SinkFailureKind, SinkResult};
pub use sync::{sync, SyncOutcome};
pub use throttle::Throttle;
