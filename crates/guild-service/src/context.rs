//! Job context - dependency container for jobs
//!
//! Holds the store repositories and the tunables every job reads.

use std::sync::Arc;

use chrono::Duration;

use guild_common::AppConfig;
use guild_core::traits::{
    ActivityLogRepository, ArchiveRepository, GuildRepository, MemberRepository, ViewRepository,
};

/// Tunables shared by the jobs
#[derive(Debug, Clone, PartialEq)]
pub struct JobSettings {
    /// Removals are suppressed when the live roster is smaller than this
    /// fraction of the persisted one
    pub min_live_ratio: f64,
    /// How long before a guild's reset the ticket log may be written
    pub reset_window: Duration,
    /// Raid whose results are copied into the store
    pub raid_id: String,
    /// Outbound sink call budget
    pub sink_calls_per_minute: u32,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            min_live_ratio: 0.5,
            reset_window: Duration::minutes(2),
            raid_id: "order66".to_string(),
            sink_calls_per_minute: 60,
        }
    }
}

impl JobSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            min_live_ratio: config.roster.min_live_ratio,
            reset_window: Duration::minutes(config.tickets.reset_window_minutes),
            raid_id: config.source.raid_id.clone(),
            sink_calls_per_minute: config.sink.calls_per_minute,
        }
    }
}

/// Job context containing all store dependencies
#[derive(Clone)]
pub struct JobContext {
    // Repositories
    guild_repo: Arc<dyn GuildRepository>,
    member_repo: Arc<dyn MemberRepository>,
    archive_repo: Arc<dyn ArchiveRepository>,
    view_repo: Arc<dyn ViewRepository>,
    activity_repo: Arc<dyn ActivityLogRepository>,

    settings: JobSettings,
}

impl JobContext {
    /// Create a new job context with all dependencies
    pub fn new(
        guild_repo: Arc<dyn GuildRepository>,
        member_repo: Arc<dyn MemberRepository>,
        archive_repo: Arc<dyn ArchiveRepository>,
        view_repo: Arc<dyn ViewRepository>,
        activity_repo: Arc<dyn ActivityLogRepository>,
        settings: JobSettings,
    ) -> Self {
        Self {
            guild_repo,
            member_repo,
            archive_repo,
            view_repo,
            activity_repo,
            settings,
        }
    }

    // === Repositories ===

    pub fn guild_repo(&self) -> &dyn GuildRepository {
        self.guild_repo.as_ref()
    }

    pub fn member_repo(&self) -> &dyn MemberRepository {
        self.member_repo.as_ref()
    }

    pub fn archive_repo(&self) -> &dyn ArchiveRepository {
        self.archive_repo.as_ref()
    }

    pub fn view_repo(&self) -> &dyn ViewRepository {
        self.view_repo.as_ref()
    }

    pub fn activity_repo(&self) -> &dyn ActivityLogRepository {
        self.activity_repo.as_ref()
    }

    // === Settings ===

    pub fn settings(&self) -> &JobSettings {
        &self.settings
    }
}
