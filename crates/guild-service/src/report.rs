//! Run report
//!
//! Failures are caught per guild and per stage so that every configured
//! guild is attempted. The report collects them, along with progress
//! counters, and decides the process exit status.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{error, info, warn};

use guild_common::ExitStatus;
use guild_core::value_objects::GuildId;
use guild_core::FailureKind;

/// Step of a job at which a failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    LoadGuilds,
    FetchRoster,
    LoadMembers,
    InsertMembers,
    UpdateStats,
    RenameMembers,
    ClearGuild,
    Archive,
    Purge,
    LogTickets,
    LogGp,
    RaidResults,
    RaidScore,
    ReadView,
    SyncView,
}

impl Stage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoadGuilds => "load_guilds",
            Self::FetchRoster => "fetch_roster",
            Self::LoadMembers => "load_members",
            Self::InsertMembers => "insert_members",
            Self::UpdateStats => "update_stats",
            Self::RenameMembers => "rename_members",
            Self::ClearGuild => "clear_guild",
            Self::Archive => "archive",
            Self::Purge => "purge",
            Self::LogTickets => "log_tickets",
            Self::LogGp => "log_gp",
            Self::RaidResults => "raid_results",
            Self::RaidScore => "raid_score",
            Self::ReadView => "read_view",
            Self::SyncView => "sync_view",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One typed failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    /// `None` for failures not tied to one guild
    pub guild_id: Option<GuildId>,
    pub stage: Stage,
    pub kind: FailureKind,
    /// Extra context such as the view name
    pub detail: Option<String>,
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.guild_id {
            Some(guild_id) => write!(f, "{guild_id}/{}: {}", self.stage, self.kind)?,
            None => write!(f, "{}: {}", self.stage, self.kind)?,
        }
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

/// Aggregated outcome of one job invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    job: &'static str,
    guilds_attempted: usize,
    failures: Vec<StageFailure>,
    suppressed_removals: Vec<GuildId>,
    counters: BTreeMap<&'static str, u64>,
}

impl RunReport {
    pub fn new(job: &'static str) -> Self {
        Self {
            job,
            guilds_attempted: 0,
            failures: Vec::new(),
            suppressed_removals: Vec::new(),
            counters: BTreeMap::new(),
        }
    }

    pub fn job(&self) -> &'static str {
        self.job
    }

    pub fn guild_attempted(&mut self) {
        self.guilds_attempted += 1;
    }

    pub fn guilds_attempted(&self) -> usize {
        self.guilds_attempted
    }

    pub fn record(&mut self, guild_id: Option<&GuildId>, stage: Stage, kind: FailureKind) {
        self.failures.push(StageFailure {
            guild_id: guild_id.cloned(),
            stage,
            kind,
            detail: None,
        });
    }

    pub fn record_with_detail(
        &mut self,
        guild_id: Option<&GuildId>,
        stage: Stage,
        kind: FailureKind,
        detail: impl Into<String>,
    ) {
        self.failures.push(StageFailure {
            guild_id: guild_id.cloned(),
            stage,
            kind,
            detail: Some(detail.into()),
        });
    }

    /// Note that removals were withheld for a guild
    pub fn suppress_removals(&mut self, guild_id: &GuildId) {
        self.suppressed_removals.push(guild_id.clone());
    }

    pub fn suppressed_removals(&self) -> &[GuildId] {
        &self.suppressed_removals
    }

    pub fn add(&mut self, counter: &'static str, n: u64) {
        *self.counters.entry(counter).or_default() += n;
    }

    pub fn counter(&self, counter: &str) -> u64 {
        self.counters.get(counter).copied().unwrap_or(0)
    }

    pub fn failures(&self) -> &[StageFailure] {
        &self.failures
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn exit_status(&self) -> ExitStatus {
        ExitStatus::from_failures(self.failures.iter().map(|f| f.kind))
    }

    /// Log the end-of-run summary
    pub fn log_summary(&self) {
        let counters = self
            .counters
            .iter()
            .map(|(name, n)| format!("{name}={n}"))
            .collect::<Vec<_>>()
            .join(" ");

        if self.is_clean() {
            info!(
                job = self.job,
                guilds = self.guilds_attempted,
                counters = %counters,
                "Run completed"
            );
        } else {
            for failure in &self.failures {
                warn!(job = self.job, failure = %failure, "Stage failed");
            }
            error!(
                job = self.job,
                guilds = self.guilds_attempted,
                failures = self.failures.len(),
                exit_code = self.exit_status().code(),
                counters = %counters,
                "Run completed with failures"
            );
        }

        if !self.suppressed_removals.is_empty() {
            warn!(
                job = self.job,
                guilds = ?self.suppressed_removals,
                "Removals were suppressed"
            );
        }
    }
}
