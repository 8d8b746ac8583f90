//! Top-level jobs, one per binary

pub mod gp;
pub mod raid_results;
pub mod raid_score;
pub mod roster_sync;
pub mod sink_push;
pub mod tickets;

pub use gp::GpLogJob;
pub use raid_results::RaidResultJob;
pub use raid_score::RaidScoreJob;
pub use roster_sync::RosterSyncJob;
pub use sink_push::SinkPushJob;
pub use tickets::TicketLogJob;
