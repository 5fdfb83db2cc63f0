use calamine::{Data, Range};
use indexmap::IndexMap;
use serde::Serialize;

use crate::cell_normalizer::{CellValue, normalize_cell};
use crate::shared_utils::{cell_coordinate, column_letter};

/// A populated cell and its address
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellRecord {
    pub value: CellValue,
    /// Column letters plus 1-based row number, e.g. "B15"
    pub coordinate: String,
}

/// A row that holds at least one populated cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowRecord {
    /// 0-based position in the sheet; skipped empty rows leave gaps
    pub row_index: u32,
    /// Column letter -> cell, populated cells only
    pub content: IndexMap<String, CellRecord>,
}

pub type SheetContent = Vec<RowRecord>;

/// Walk a decoded sheet and keep only populated rows and cells.
///
/// calamine trims the grid to the used area, so positions are offset by `range.start()`
/// to recover the original row and column of every cell.
pub fn extract_sheet(range: &Range<Data>) -> SheetContent {
    let Some((first_row, first_col)) = range.start() else {
        return SheetContent::new();
    };

    let mut sheet_content = SheetContent::new();

    for (offset, row) in range.rows().enumerate() {
        let row_index = first_row + offset as u32;
        let mut content = IndexMap::new();

        for (col_offset, raw) in row.iter().enumerate() {
            let Some(value) = normalize_cell(raw) else {
                continue;
            };
            let col = first_col + col_offset as u32;
            content.insert(
                column_letter(col),
                CellRecord {
                    value,
                    coordinate: cell_coordinate(row_index, col),
                },
            );
        }

        if !content.is_empty() {
            sheet_content.push(RowRecord { row_index, content });
        }
    }

    sheet_content
}
