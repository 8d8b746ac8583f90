//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in guild-core.
//! Each operation opens its own connection through [`ConnectionFactory`].
//!
//! [`ConnectionFactory`]: crate::connection::ConnectionFactory

mod activity;
mod archive;
mod error;
mod guild;
mod member;
mod view;

pub use activity::PgActivityLogRepository;
pub use archive::PgArchiveRepository;
pub use error::map_db_error;
pub use guild::PgGuildRepository;
pub use member::PgMemberRepository;
pub use view::PgViewRepository;
