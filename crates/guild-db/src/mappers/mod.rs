//! Entity <-> model mappers
//!
//! Batches are bound as parallel arrays and expanded with `UNNEST`, so each
//! write entity maps to one column-oriented struct.

mod archive;
mod cells;
mod guild;
mod member;

pub use archive::ArchiveColumns;
pub use cells::row_to_cells;
pub use member::{MemberColumns, MemberStatColumns, RenameColumns};
