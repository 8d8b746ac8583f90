//! View rows -> sink cells

use sqlx::postgres::PgRow;
use sqlx::Row;

use guild_core::entities::{ColumnKind, ViewSpec};
use guild_core::value_objects::Cell;

/// Placeholder written for missing score-like values
const MISSING_METRIC: &str = "-";

/// Decode one column into a cell, `None` for SQL NULL
fn decode(row: &PgRow, index: usize, kind: ColumnKind) -> Result<Option<Cell>, sqlx::Error> {
    let cell = match kind {
        ColumnKind::Text | ColumnKind::Timestamp => {
            row.try_get::<Option<String>, _>(index)?.map(Cell::text)
        }
        ColumnKind::Number | ColumnKind::Metric => {
            row.try_get::<Option<f64>, _>(index)?.map(Cell::Number)
        }
        ColumnKind::Flag => row.try_get::<Option<bool>, _>(index)?.map(Cell::Bool),
    };
    Ok(cell)
}

/// Render a NULL according to the column kind
fn null_cell(kind: ColumnKind) -> Cell {
    match kind {
        ColumnKind::Metric => Cell::text(MISSING_METRIC),
        _ => Cell::Empty,
    }
}

/// Convert a row selected by [`crate::queries::view_sql`] into cells.
///
/// Returns `None` when the view drops incomplete rows and this one has a NULL.
pub fn row_to_cells(row: &PgRow, spec: &ViewSpec) -> Result<Option<Vec<Cell>>, sqlx::Error> {
    let mut cells = Vec::with_capacity(spec.columns.len());
    for (index, column) in spec.columns.iter().enumerate() {
        match decode(row, index, column.kind)? {
            Some(cell) => cells.push(cell),
            None if spec.drop_incomplete_rows => return Ok(None),
            None => cells.push(null_cell(column.kind)),
        }
    }
    Ok(Some(cells))
}
