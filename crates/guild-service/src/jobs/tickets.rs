//! Ticket log job
//!
//! Runs for a guild only right before its daily reset, when the day's
//! contribution counters are final. Only members short of the quota are
//! logged.

use chrono::{Local, NaiveDateTime};
use tracing::{debug, error, info, instrument};

use guild_core::entities::Guild;
use guild_source::RosterSource;

use crate::context::JobContext;
use crate::report::{RunReport, Stage};
use crate::reset::is_around_reset;

pub const JOB_NAME: &str = "log-tickets";

/// Ticket log job
pub struct TicketLogJob<'a> {
    ctx: &'a JobContext,
    source: &'a dyn RosterSource,
}

impl<'a> TicketLogJob<'a> {
    pub fn new(ctx: &'a JobContext, source: &'a dyn RosterSource) -> Self {
        Self { ctx, source }
    }

    pub async fn run(&self) -> RunReport {
        self.run_at(Local::now().naive_local()).await
    }

    /// Run as if the local time were `now`
    pub async fn run_at(&self, now: NaiveDateTime) -> RunReport {
        let mut report = RunReport::new(JOB_NAME);

        let guilds = match self.ctx.guild_repo().list_guilds().await {
            Ok(guilds) => guilds,
            Err(e) => {
                error!(error = %e, "Failed to load guilds");
                report.record(None, Stage::LoadGuilds, e.failure_kind());
                return report;
            }
        };

        let window = self.ctx.settings().reset_window;
        for guild in &guilds {
            if !is_around_reset(now, guild.reset_time, window) {
                debug!(guild = %guild.display_name, reset_time = %guild.reset_time, "Not reset time");
                report.add("outside_window", 1);
                continue;
            }
            report.guild_attempted();
            self.log_guild(guild, &mut report).await;
        }

        report
    }

    #[instrument(skip(self, guild, report), fields(guild_id = %guild.guild_id, guild = %guild.display_name))]
    async fn log_guild(&self, guild: &Guild, report: &mut RunReport) {
        let snapshot = match self.source.fetch_guild(&guild.guild_id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(error = %e, "Failed to fetch roster, skipping guild");
                report.record(Some(&guild.guild_id), Stage::FetchRoster, e.failure_kind());
                return;
            }
        };

        let losses = snapshot.ticket_losses();
        if losses.is_empty() {
            info!("No tickets to log");
            return;
        }

        match self.ctx.activity_repo().insert_ticket_logs(&losses).await {
            Ok(n) => {
                info!(logged = n, "Logged tickets");
                report.add("ticket_logs", n);
            }
            Err(e) => {
                error!(batch_size = losses.len(), error = %e, "Failed to log tickets");
                report.record(Some(&guild.guild_id), Stage::LogTickets, e.failure_kind());
            }
        }
    }
}
