//! Raid score log job

use tracing::{error, info, instrument, warn};

use guild_core::entities::Guild;

use crate::context::JobContext;
use crate::report::{RunReport, Stage};

pub const JOB_NAME: &str = "log-raid-score";

/// Copy each guild's current raid performance into the score log
pub struct RaidScoreJob<'a> {
    ctx: &'a JobContext,
}

impl<'a> RaidScoreJob<'a> {
    pub fn new(ctx: &'a JobContext) -> Self {
        Self { ctx }
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
            self.log_guild(guild, &mut report).await;
        }
        report
    }

    #[instrument(skip(self, guild, report), fields(guild_id = %guild.guild_id))]
    async fn log_guild(&self, guild: &Guild, report: &mut RunReport) {
        let logs = match self.ctx.view_repo().list_raid_performance(&guild.guild_id).await {
            Ok(logs) => logs,
            Err(e) => {
                error!(error = %e, "Failed to read raid performance");
                report.record(Some(&guild.guild_id), Stage::ReadView, e.failure_kind());
                return;
            }
        };
        if logs.is_empty() {
            warn!(guild = %guild.display_name, "No raid performance data");
            return;
        }

        match self.ctx.activity_repo().insert_raid_score_logs(&logs).await {
            Ok(n) => {
                info!(guild = %guild.display_name, logged = n, "Logged raid scores");
                report.add("raid_score_logs", n);
            }
            Err(e) => {
                error!(batch_size = logs.len(), error = %e, "Failed to log raid scores");
                report.record(Some(&guild.guild_id), Stage::RaidScore, e.failure_kind());
            }
        }
    }
}
