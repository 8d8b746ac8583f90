//! Application error types and process exit codes

mod app_error;
mod exit_status;

pub use app_error::{AppError, AppResult};
pub use exit_status::ExitStatus;
