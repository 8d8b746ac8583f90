//! Store each member's progress in the most recent tracked raid

use std::process::ExitCode;

use guild_common::AppError;
use guild_service::jobs::raid_results::{RaidResultJob, JOB_NAME};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    guild_jobs::run(JOB_NAME, |config, ctx| async move {
        let source = guild_jobs::roster_source(&config)?;
        Ok::<_, AppError>(RaidResultJob::new(&ctx, &source).run().await)
    })
    .await
}
