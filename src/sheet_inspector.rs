use calamine::{Data, Range};
use serde::Serialize;

use crate::error::{ExtractError, Result};
use crate::workbook_loader::{SheetState, WorkbookHandle};

/// Structural summary of one sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetInfo {
    /// 1-based number of the last used row
    pub max_row: u32,
    /// 1-based number of the last used column
    pub max_column: u32,
    pub has_merged_cells: bool,
    pub sheet_state: SheetState,
}

/// Summarize a sheet whose grid has already been decoded.
///
/// A sheet without cells reports a 1x1 extent.
pub fn inspect_sheet(handle: &WorkbookHandle<'_>, name: &str, range: &Range<Data>) -> Result<SheetInfo> {
    let sheet_state = handle
        .sheet_state(name)
        .ok_or_else(|| ExtractError::sheet(name, "no such sheet in workbook"))?;

    let (max_row, max_column) = match range.end() {
        Some((row, col)) => (row + 1, col + 1),
        None => (1, 1),
    };

    Ok(SheetInfo {
        max_row,
        max_column,
        has_merged_cells: handle.merged_region_count(name) > 0,
        sheet_state,
    })
}
