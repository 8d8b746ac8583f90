//! Value objects - immutable domain primitives

mod cell;
mod ids;
mod order;

pub use cell::Cell;
pub use ids::{GuildId, MemberId};
pub use order::{
    validate_order, validate_timeframe, Direction, OrderClause, SortColumn, Timeframe,
};
