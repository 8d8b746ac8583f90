//! # guild-core
//!
//! Domain layer for guild roster reconciliation: members, archive records,
//! guild configuration, sink view definitions, whitelisted sort directives,
//! and the store ports implemented by the infrastructure crates.
//! This crate has zero dependencies on infrastructure (database, HTTP, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    ArchiveRecord, ColumnKind, GpLog, Guild, Member, MemberKey, RaidResult, RaidScoreLog, Rename,
    TicketLog, ViewColumn, ViewKind, ViewSpec,
};
pub use error::{DomainError, FailureKind};
pub use traits::{
    ActivityLogRepository, ArchiveRepository, GuildRepository, MemberRepository, ReadOutcome,
    RepoResult, ViewRepository,
};
pub use value_objects::{
    validate_order, validate_timeframe, Cell, Direction, GuildId, MemberId, OrderClause,
    SortColumn, Timeframe,
};
