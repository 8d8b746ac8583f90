//! Append raid performance relative to the guild average

use std::process::ExitCode;

use guild_common::AppError;
use guild_service::jobs::raid_score::{RaidScoreJob, JOB_NAME};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    guild_jobs::run(JOB_NAME, |_config, ctx| async move {
        Ok::<_, AppError>(RaidScoreJob::new(&ctx).run().await)
    })
    .await
}
