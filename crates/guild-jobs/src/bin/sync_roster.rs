//! Reconcile stored rosters with the live guild data, then archive leavers
//!
//! ```bash
//! cargo run -p guild-jobs --bin sync-roster
//! ```

use std::process::ExitCode;

use guild_common::AppError;
use guild_service::jobs::roster_sync::{RosterSyncJob, JOB_NAME};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    guild_jobs::run(JOB_NAME, |config, ctx| async move {
        let source = guild_jobs::roster_source(&config)?;
        Ok::<_, AppError>(RosterSyncJob::new(&ctx, &source).run().await)
    })
    .await
}
