//! Ports implemented by the infrastructure crates

mod outcome;
mod repositories;

pub use outcome::ReadOutcome;
pub use repositories::{
    ActivityLogRepository, ArchiveRepository, GuildRepository, MemberRepository, RepoResult,
    ViewRepository,
};
