//! Raid result job
//!
//! Copies each member's progress in the configured raid into the store.
//! Members who did not take part get an empty result.

use tracing::{error, info, instrument, warn};

use guild_core::entities::{Guild, RaidResult};
use guild_core::FailureKind;
use guild_source::RosterSource;

use crate::context::JobContext;
use crate::report::{RunReport, Stage};

pub const JOB_NAME: &str = "check-raid-results";

/// Raid result job
pub struct RaidResultJob<'a> {
    ctx: &'a JobContext,
    source: &'a dyn RosterSource,
}

impl<'a> RaidResultJob<'a> {
    pub fn new(ctx: &'a JobContext, source: &'a dyn RosterSource) -> Self {
        Self { ctx, source }
    }

    pub async fn run(&self) -> RunReport {
        let mut report = RunReport::new(JOB_NAME);

        let guilds = match self.ctx.guild_repo().list_guilds().await {
            Ok(guilds) => guilds,
            Err(e) => {
                error!(error = %e, "Failed to load guilds");
                report.record(None, Stage::LoadGuilds, e.failure_kind());
                return report;
            }
        };

        for guild in &guilds {
            report.guild_attempted();
            self.update_guild(guild, &mut report).await;
        }
        report
    }

    #[instrument(skip(self, guild, report), fields(guild_id = %guild.guild_id))]
    async fn update_guild(&self, guild: &Guild, report: &mut RunReport) {
        let guild_id = &guild.guild_id;
        let raid_id = self.ctx.settings().raid_id.as_str();

        let snapshot = match self.source.fetch_guild(guild_id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(error = %e, "Failed to fetch roster, skipping guild");
                report.record(Some(guild_id), Stage::FetchRoster, e.failure_kind());
                return;
            }
        };
        let Some(raid) = snapshot.raid(raid_id) else {
            warn!(raid_id, "Roster has no recent result for raid, skipping guild");
            report.record_with_detail(Some(guild_id), Stage::RaidResults, FailureKind::DataShape, raid_id);
            return;
        };

        let members = match self.ctx.member_repo().list_members(Some(guild_id)).await {
            Ok(members) => members,
            Err(e) => {
                error!(error = %e, "Failed to load members");
                report.record(Some(guild_id), Stage::LoadMembers, e.failure_kind());
                return;
            }
        };

        let results: Vec<RaidResult> = members
            .into_iter()
            .map(|m| RaidResult {
                last_raid_result: raid.progress.get(&m.member_id).copied(),
                member_id: m.member_id,
            })
            .collect();
        let participants = results.iter().filter(|r| r.last_raid_result.is_some()).count();

        match self.ctx.member_repo().update_raid_results(&results).await {
            Ok(n) => {
                info!(updated = n, participants, "Updated raid results");
                report.add("raid_results", n);
            }
            Err(e) => {
                error!(batch_size = results.len(), error = %e, "Failed to update raid results");
                report.record(Some(guild_id), Stage::RaidResults, e.failure_kind());
            }
        }
    }
}
