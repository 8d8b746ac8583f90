//! Roster sync job
//!
//! Per guild: fetch the live roster, diff it against the store, insert new
//! members, refresh stats and names of retained ones, and detach leavers.
//! Once every guild is done, members no longer attached to a configured
//! guild are archived and purged. Leavers are archived as they were stored
//! before being detached, so their record names the guild they left.

use std::collections::HashSet;

use tracing::{error, info, instrument, warn};

use guild_core::entities::{Guild, Member};
use guild_core::value_objects::{GuildId, MemberId};
use guild_source::RosterSource;

use crate::archive::ArchiveManager;
use crate::context::JobContext;
use crate::differ::{diff, RemovalGuard};
use crate::report::{RunReport, Stage};

pub const JOB_NAME: &str = "sync-roster";

/// Roster sync job
pub struct RosterSyncJob<'a> {
    ctx: &'a JobContext,
    source: &'a dyn RosterSource,
}

impl<'a> RosterSyncJob<'a> {
    pub fn new(ctx: &'a JobContext, source: &'a dyn RosterSource) -> Self {
        Self { ctx, source }
    }

    pub async fn run(&self) -> RunReport {
        let mut report = RunReport::new(JOB_NAME);

        let guilds = match self.ctx.guild_repo().list_guilds().await {
            Ok(guilds) => guilds,
            Err(e) => {
                error!(error = %e, "Failed to load guilds, nothing to sync");
                report.record(None, Stage::LoadGuilds, e.failure_kind());
                return report;
            }
        };
        if guilds.is_empty() {
            warn!("No guilds configured");
            return report;
        }

        let mut departed = Vec::new();
        for guild in &guilds {
            report.guild_attempted();
            self.sync_guild(guild, &mut report, &mut departed).await;
        }

        let configured: Vec<GuildId> = guilds.into_iter().map(|g| g.guild_id).collect();
        let outcome = ArchiveManager::new(self.ctx)
            .sweep(&configured, &departed)
            .await;
        report.add("archived", outcome.archived as u64);
        report.add("purged", outcome.purged);
        report.add("deferred", outcome.deferred as u64);
        if let Some((stage, kind)) = outcome.failure {
            report.record(None, stage, kind);
        }

        report
    }

    #[instrument(skip(self, guild, report, departed), fields(guild_id = %guild.guild_id, guild = %guild.display_name))]
    async fn sync_guild(&self, guild: &Guild, report: &mut RunReport, departed: &mut Vec<Member>) {
        let guild_id = &guild.guild_id;

        let snapshot = match self.source.fetch_guild(guild_id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(error = %e, "Failed to fetch roster, skipping guild");
                report.record(Some(guild_id), Stage::FetchRoster, e.failure_kind());
                return;
            }
        };
        let persisted = match self.ctx.member_repo().list_members(Some(guild_id)).await {
            Ok(members) => members,
            Err(e) => {
                error!(error = %e, "Failed to load stored members, skipping guild");
                report.record(Some(guild_id), Stage::LoadMembers, e.failure_kind());
                return;
            }
        };

        let mut changes = diff(&snapshot.members, &persisted);
        info!(
            live = snapshot.members.len(),
            stored = persisted.len(),
            to_add = changes.to_add.len(),
            to_remove = changes.to_remove.len(),
            renamed = changes.renamed.len(),
            "Diffed roster"
        );

        let guard = RemovalGuard::new(self.ctx.settings().min_live_ratio);
        if !changes.to_remove.is_empty()
            && !guard.allows_removals(snapshot.members.len(), persisted.len())
        {
            warn!(
                live = snapshot.members.len(),
                stored = persisted.len(),
                withheld = changes.to_remove.len(),
                "Live roster is implausibly small, not removing anyone"
            );
            report.suppress_removals(guild_id);
            changes.to_remove.clear();
        }

        let members = self.ctx.member_repo();

        match members.insert_members(&changes.to_add).await {
            Ok(n) => report.add("inserted", n),
            Err(e) => {
                error!(batch_size = changes.to_add.len(), error = %e, "Failed to insert members");
                report.record(Some(guild_id), Stage::InsertMembers, e.failure_kind());
            }
        }

        // New ids that already existed detached are reattached here
        let refreshed: Vec<_> = changes.retained.iter().chain(&changes.to_add).cloned().collect();
        match members.update_member_stats(&refreshed).await {
            Ok(n) => report.add("updated", n),
            Err(e) => {
                error!(batch_size = refreshed.len(), error = %e, "Failed to update stats");
                report.record(Some(guild_id), Stage::UpdateStats, e.failure_kind());
            }
        }

        for rename in &changes.renamed {
            info!(
                member_id = %rename.member_id,
                from = %rename.previous_name,
                to = %rename.current_name,
                "Member renamed"
            );
        }
        let renamed = changes.renamed_members();
        match members.rename_members(&renamed).await {
            Ok(n) => report.add("renamed", n),
            Err(e) => {
                error!(batch_size = renamed.len(), error = %e, "Failed to rename members");
                report.record(Some(guild_id), Stage::RenameMembers, e.failure_kind());
            }
        }

        let leavers = changes.removed_ids();
        for key in &changes.to_remove {
            info!(member_id = %key.member_id, name = %key.display_name, "Member left guild");
        }
        match members.clear_guild(&leavers).await {
            Ok(n) => {
                report.add("detached", n);
                let left: HashSet<&MemberId> = leavers.iter().collect();
                departed.extend(
                    persisted
                        .into_iter()
                        .filter(|m| left.contains(&m.member_id)),
                );
            }
            Err(e) => {
                error!(batch_size = leavers.len(), error = %e, "Failed to detach leavers");
                report.record(Some(guild_id), Stage::ClearGuild, e.failure_kind());
            }
        }
    }
}
