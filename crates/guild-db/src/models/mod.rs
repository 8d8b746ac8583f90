//! Database models - rows as SQLx reads them

mod guild;
mod member;
mod raid;

pub use guild::GuildModel;
pub use member::MemberModel;
pub use raid::RaidPerformanceModel;
