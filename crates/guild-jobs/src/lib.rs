//! # guild-jobs
//!
//! Process bootstrap shared by the job binaries: configuration, logging,
//! the PostgreSQL-backed [`JobContext`], and the exit code a scheduler sees.
//!
//! Each binary is a thin wrapper around [`run`]:
//!
//! ```rust,ignore
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> ExitCode {
//!     guild_jobs::run(jobs::gp::JOB_NAME, |_config, ctx| async move {
//!         Ok(GpLogJob::new(&ctx).run().await)
//!     })
//!     .await
//! }
//! ```

use std::future::Future;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use guild_common::{
    try_init_tracing_with_config, AppConfig, AppError, AppResult, Environment, TracingConfig,
};
use guild_db::{
    ConnectionFactory, PgActivityLogRepository, PgArchiveRepository, PgGuildRepository,
    PgMemberRepository, PgViewRepository,
};
use guild_service::{JobContext, JobSettings, RunReport};
use guild_sink::GoogleSheetsClient;
use guild_source::{HttpRosterSource, TicketRules};

/// Load configuration, start logging, build the context and run one job.
///
/// Never panics on bad setup: configuration and credential problems map to
/// their own exit codes, and a finished job exits with the code derived from
/// its report.
pub async fn run<F, Fut>(job: &'static str, body: F) -> ExitCode
where
    F: FnOnce(AppConfig, JobContext) -> Fut,
    Fut: Future<Output = AppResult<RunReport>>,
{
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(Environment::default());
            return abort(job, &AppError::from(e));
        }
    };
    init_tracing(config.app.env);

    info!(job, env = ?config.app.env, "Starting job");

    let ctx = match build_context(&config) {
        Ok(ctx) => ctx,
        Err(e) => return abort(job, &e),
    };

    match body(config, ctx).await {
        Ok(report) => {
            report.log_summary();
            report.exit_status().into()
        }
        Err(e) => abort(job, &e),
    }
}

fn init_tracing(env: Environment) {
    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }
}

fn abort(job: &'static str, err: &AppError) -> ExitCode {
    let status = err.exit_status();
    error!(job, error = %err, code = err.error_code(), exit = status.code(), "Job aborted");
    status.into()
}

/// Wire the PostgreSQL repositories into a job context
pub fn build_context(config: &AppConfig) -> AppResult<JobContext> {
    let connections = ConnectionFactory::new(&config.database)?;

    Ok(JobContext::new(
        Arc::new(PgGuildRepository::new(connections.clone())),
        Arc::new(PgMemberRepository::new(connections.clone())),
        Arc::new(PgArchiveRepository::new(connections.clone())),
        Arc::new(PgViewRepository::new(connections.clone())),
        Arc::new(PgActivityLogRepository::new(connections)),
        JobSettings::from_config(config),
    ))
}

/// HTTP roster source for jobs that read live guild data
pub fn roster_source(config: &AppConfig) -> AppResult<HttpRosterSource> {
    let url = config.require_guild_url()?;
    let rules = TicketRules {
        daily_quota: config.tickets.daily_quota,
        contribution_type: config.tickets.contribution_type,
    };

    HttpRosterSource::new(url, Duration::from_secs(config.source.timeout_secs), rules)
        .map_err(AppError::internal)
}

/// Sheets client authenticated with the configured service account
pub fn sheets_client(config: &AppConfig) -> AppResult<GoogleSheetsClient> {
    let path = config.require_credentials_path()?;
    GoogleSheetsClient::from_credentials_file(Path::new(path)).map_err(|e| {
        warn!(path, error = %e, "Could not load sink credentials");
        AppError::Credentials(e.to_string())
    })
}
