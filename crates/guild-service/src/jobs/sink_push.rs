//! Push-to-sinks job
//!
//! For every guild and view: read the view's directives back from the
//! sink, query the store with the validated order and timeframe, and
//! synchronize the result into the view's range.

use tracing::{error, info, instrument, warn};

use guild_core::entities::{Guild, ViewKind};
use guild_core::traits::ReadOutcome;
use guild_sink::{read_directives, sync, SheetClient, SinkCache, SyncOutcome, Throttle};

use crate::context::JobContext;
use crate::report::{RunReport, Stage};

pub const JOB_NAME: &str = "push-to-sinks";

/// Push-to-sinks job
pub struct SinkPushJob<'a> {
    ctx: &'a JobContext,
    client: &'a dyn SheetClient,
}

impl<'a> SinkPushJob<'a> {
    pub fn new(ctx: &'a JobContext, client: &'a dyn SheetClient) -> Self {
        Self { ctx, client }
    }

    pub async fn run(&self) -> RunReport {
        let throttle = Throttle::new(self.ctx.settings().sink_calls_per_minute);
        self.run_with(throttle).await
    }

    /// Run with an explicit throttle
    pub async fn run_with(&self, throttle: Throttle) -> RunReport {
        let mut report = RunReport::new(JOB_NAME);
        let mut cache = SinkCache::new(self.client, throttle);

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
            for kind in ViewKind::ALL {
                self.push_view(guild, kind, &mut cache, &mut report).await;
            }
        }
        report
    }

    #[instrument(
        skip(self, guild, cache, report),
        fields(guild_id = %guild.guild_id, view = kind.sheet_name())
    )]
    async fn push_view(
        &self,
        guild: &Guild,
        kind: ViewKind,
        cache: &mut SinkCache<'_>,
        report: &mut RunReport,
    ) {
        let target = guild.sink_target.as_str();
        let sheet = kind.sheet_name();
        let spec = kind.spec();

        let current = cache.get_cached(target, sheet).await;
        let directives = read_directives(current, spec);
        info!(order = %directives.order, timeframe = %directives.timeframe, "Resolved view directives");

        let result = self
            .ctx
            .view_repo()
            .read_view(&guild.guild_id, kind, directives.order, directives.timeframe)
            .await;
        let rows = match ReadOutcome::from_result(sheet, result) {
            ReadOutcome::Failed(failure) => {
                warn!("View query failed, leaving sink untouched");
                report.record_with_detail(Some(&guild.guild_id), Stage::ReadView, failure, sheet);
                return;
            }
            outcome => outcome.into_rows(),
        };

        match sync(cache, target, sheet, kind.range(), &rows).await {
            SyncOutcome::Written => report.add("views_written", 1),
            SyncOutcome::Skipped => report.add("views_skipped", 1),
            SyncOutcome::Failed(failure) => {
                report.record_with_detail(Some(&guild.guild_id), Stage::SyncView, failure.into(), sheet);
            }
        }
    }
}
