//! Galactic power history job

use tracing::{error, info, instrument};

use guild_core::entities::{GpLog, Guild};

use crate::context::JobContext;
use crate::report::{RunReport, Stage};

pub const JOB_NAME: &str = "log-gp";

/// Snapshot every stored member's galactic power into the history table
pub struct GpLogJob<'a> {
    ctx: &'a JobContext,
}

impl<'a> GpLogJob<'a> {
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
        let members = match self.ctx.member_repo().list_members(Some(&guild.guild_id)).await {
            Ok(members) => members,
            Err(e) => {
                error!(error = %e, "Failed to load members");
                report.record(Some(&guild.guild_id), Stage::LoadMembers, e.failure_kind());
                return;
            }
        };

        let logs: Vec<GpLog> = members
            .into_iter()
            .map(|m| GpLog {
                member_id: m.member_id,
                galactic_power: m.galactic_power,
            })
            .collect();

        match self.ctx.activity_repo().insert_gp_logs(&logs).await {
            Ok(n) => {
                info!(guild = %guild.display_name, logged = n, "Logged GP");
                report.add("gp_logs", n);
            }
            Err(e) => {
                error!(batch_size = logs.len(), error = %e, "Failed to log GP");
                report.record(Some(&guild.guild_id), Stage::LogGp, e.failure_kind());
            }
        }
    }
}
