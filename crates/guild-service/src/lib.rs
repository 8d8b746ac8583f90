//! # guild-service
//!
//! Application layer: roster reconciliation, archival, the logging jobs, and
//! publishing views to sinks. Every job attempts every configured guild and
//! returns a [`RunReport`] instead of failing.

pub mod archive;
pub mod context;
pub mod differ;
pub mod jobs;
pub mod report;
pub mod reset;

pub use archive::{ArchiveManager, ArchiveOutcome};
pub use context::{JobContext, JobSettings};
pub use differ::{diff, RemovalGuard, RosterDiff};
pub use jobs::{GpLogJob, RaidResultJob, RaidScoreJob, RosterSyncJob, SinkPushJob, TicketLogJob};
pub use report::{RunReport, Stage, StageFailure};
pub use reset::{is_around_reset, next_reset};
