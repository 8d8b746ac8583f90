//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Every write takes a batch and reports how
//! many rows it touched; an empty batch is a no-op that never reaches the
//! store.

use async_trait::async_trait;

use crate::entities::{
    ArchiveRecord, GpLog, Guild, Member, RaidResult, RaidScoreLog, TicketLog, ViewKind,
};
use crate::error::DomainError;
use crate::value_objects::{Cell, GuildId, MemberId, OrderClause, Timeframe};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Guild Repository
// ============================================================================

#[async_trait]
pub trait GuildRepository: Send + Sync {
    /// List every configured guild
    async fn list_guilds(&self) -> RepoResult<Vec<Guild>>;
}

// ============================================================================
// Member Repository
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// List active-store members, optionally restricted to one guild
    async fn list_members(&self, guild_id: Option<&GuildId>) -> RepoResult<Vec<Member>>;

    /// Members whose affiliation is cleared or points at an unconfigured guild
    async fn list_archive_candidates(&self, configured: &[GuildId]) -> RepoResult<Vec<Member>>;

    /// Insert new members; ids already present are left untouched
    async fn insert_members(&self, members: &[Member]) -> RepoResult<u64>;

    /// Refresh galactic power and last activity, and reattach members that
    /// carry a guild (a returning member may still be detached)
    async fn update_member_stats(&self, members: &[Member]) -> RepoResult<u64>;

    /// Persist display-name changes
    async fn rename_members(&self, members: &[Member]) -> RepoResult<u64>;

    /// Clear the guild affiliation of the given members
    async fn clear_guild(&self, member_ids: &[MemberId]) -> RepoResult<u64>;

    /// Hard delete from the active store
    async fn delete_members(&self, member_ids: &[MemberId]) -> RepoResult<u64>;

    /// Set each member's latest raid progress
    async fn update_raid_results(&self, results: &[RaidResult]) -> RepoResult<u64>;
}

// ============================================================================
// Archive Repository
// ============================================================================

#[async_trait]
pub trait ArchiveRepository: Send + Sync {
    /// Append archive records, skipping members that are already archived.
    ///
    /// Returns the ids confirmed present in the archive afterwards, whether
    /// inserted now or by an earlier run. Only these may be purged.
    async fn insert_archive_records(&self, records: &[ArchiveRecord]) -> RepoResult<Vec<MemberId>>;
}

// ============================================================================
// View Repository
// ============================================================================

#[async_trait]
pub trait ViewRepository: Send + Sync {
    /// Read one derived view for a guild as sink-ready rows
    async fn read_view(
        &self,
        guild_id: &GuildId,
        kind: ViewKind,
        order: OrderClause,
        timeframe: Timeframe,
    ) -> RepoResult<Vec<Vec<Cell>>>;

    /// Current raid performance of a guild's members
    async fn list_raid_performance(&self, guild_id: &GuildId) -> RepoResult<Vec<RaidScoreLog>>;
}

// ============================================================================
// Activity Log Repository
// ============================================================================

#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    async fn insert_ticket_logs(&self, logs: &[TicketLog]) -> RepoResult<u64>;

    async fn insert_gp_logs(&self, logs: &[GpLog]) -> RepoResult<u64>;

    async fn insert_raid_score_logs(&self, logs: &[RaidScoreLog]) -> RepoResult<u64>;
}
