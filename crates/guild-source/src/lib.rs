//! # Guild Source
//!
//! Adapter for the third-party roster source. One POST per guild returns the
//! live member list plus recent raid results; this crate decodes it into
//! domain [`Member`](guild_core::entities::Member)s.

pub mod client;
pub mod error;
pub mod payloads;
pub mod snapshot;

use async_trait::async_trait;

use guild_core::value_objects::GuildId;

pub use client::HttpRosterSource;
pub use error::{SourceError, SourceResult};
pub use payloads::TicketRules;
pub use snapshot::{GuildSnapshot, RaidProgress};

/// Live roster provider
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Fetch the current roster of one guild
    async fn fetch_guild(&self, guild_id: &GuildId) -> SourceResult<GuildSnapshot>;
}
