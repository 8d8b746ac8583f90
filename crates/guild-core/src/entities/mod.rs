//! Domain entities - core business objects

mod archive;
mod guild;
mod logs;
mod member;
mod view;

pub use archive::ArchiveRecord;
pub use guild::Guild;
pub use logs::{GpLog, RaidResult, RaidScoreLog, TicketLog};
pub use member::{Member, MemberKey, Rename};
pub use view::{ColumnKind, ViewColumn, ViewKind, ViewSpec};
