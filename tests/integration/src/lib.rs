//! Integration test utilities for the guild jobs
//!
//! Jobs run end to end against in-memory stand-ins for the store, the
//! roster API and the spreadsheet sink, so no external service is needed.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
