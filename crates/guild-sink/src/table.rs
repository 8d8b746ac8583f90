//! Normalization of sink tables for comparison

use guild_core::value_objects::Cell;

use crate::client::SheetTable;

/// Data rows of a view with the trailing metadata column removed.
///
/// The first row is the header. The widest row fixes the table width and the
/// metadata column is the last column of that width. The Sheets API trims
/// trailing blank cells from every row, the header included, so shorter rows
/// are treated as padded with blanks.
pub fn data_rows(table: &SheetTable) -> Vec<Vec<Cell>> {
    let width = table.iter().map(Vec::len).max().unwrap_or(0);
    let data_width = width.saturating_sub(1);

    table
        .iter()
        .skip(1)
        .map(|row| row.iter().take(data_width).cloned().collect())
        .collect()
}

/// Cells of the trailing metadata column, one per data row
pub fn metadata_column(table: &SheetTable) -> Vec<Cell> {
    let width = table.iter().map(Vec::len).max().unwrap_or(0);
    let Some(index) = width.checked_sub(1) else {
        return Vec::new();
    };

    table
        .iter()
        .skip(1)
        .map(|row| row.get(index).cloned().unwrap_or_default())
        .collect()
}

/// Trailing blank cells and trailing blank rows carry no content
fn canonical(rows: &[Vec<Cell>]) -> Vec<&[Cell]> {
    let mut out: Vec<&[Cell]> = rows
        .iter()
        .map(|row| {
            let len = row.iter().rposition(|c| !c.is_empty()).map_or(0, |i| i + 1);
            &row[..len]
        })
        .collect();
    while out.last().is_some_and(|row| row.is_empty()) {
        out.pop();
    }
    out
}

/// Order-sensitive, cell-by-cell equality ignoring blank padding
pub fn same_content(current: &[Vec<Cell>], fresh: &[Vec<Cell>]) -> bool {
    canonical(current) == canonical(fresh)
}
