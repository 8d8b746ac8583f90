//! Snapshot every stored member's galactic power

use std::process::ExitCode;

use guild_common::AppError;
use guild_service::jobs::gp::{GpLogJob, JOB_NAME};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    guild_jobs::run(JOB_NAME, |_config, ctx| async move {
        Ok::<_, AppError>(GpLogJob::new(&ctx).run().await)
    })
    .await
}
