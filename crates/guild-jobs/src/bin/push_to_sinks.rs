//! Publish every view of every guild to its spreadsheet
//!
//! Views whose content has not changed are left untouched.

use std::process::ExitCode;

use guild_common::AppError;
use guild_service::jobs::sink_push::{SinkPushJob, JOB_NAME};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    guild_jobs::run(JOB_NAME, |config, ctx| async move {
        let client = guild_jobs::sheets_client(&config)?;
        Ok::<_, AppError>(SinkPushJob::new(&ctx, &client).run().await)
    })
    .await
}
