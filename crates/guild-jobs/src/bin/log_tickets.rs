//! Record raid tickets lost today; does nothing outside the reset window

use std::process::ExitCode;

use guild_common::AppError;
use guild_service::jobs::tickets::{TicketLogJob, JOB_NAME};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    guild_jobs::run(JOB_NAME, |config, ctx| async move {
        let source = guild_jobs::roster_source(&config)?;
        Ok::<_, AppError>(TicketLogJob::new(&ctx, &source).run().await)
    })
    .await
}
