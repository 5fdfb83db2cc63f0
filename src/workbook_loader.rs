use std::io::Cursor;

use calamine::{Data, Range, Reader, SheetType, SheetVisible, Xlsx, open_workbook_from_rs};
use serde::Serialize;

use crate::error::{ExtractError, Result};

/// Visibility of a sheet as stored in the workbook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SheetState {
    Visible,
    Hidden,
    VeryHidden,
}

impl From<&SheetVisible> for SheetState {
    fn from(visible: &SheetVisible) -> Self {
        match visible {
            SheetVisible::Visible => SheetState::Visible,
            SheetVisible::Hidden => SheetState::Hidden,
            SheetVisible::VeryHidden => SheetState::VeryHidden,
        }
    }
}

#[derive(Debug, Clone)]
struct SheetEntry {
    name: String,
    state: SheetState,
    is_worksheet: bool,
}

/// An opened workbook backed by a borrowed byte buffer
pub struct WorkbookHandle<'a> {
    workbook: Xlsx<Cursor<&'a [u8]>>,
    sheets: Vec<SheetEntry>,
}

impl<'a> WorkbookHandle<'a> {
    /// Open an xlsx/xlsm buffer. Cell values are the cached results, never formula text.
    pub fn open(bytes: &'a [u8]) -> Result<Self> {
        let mut workbook: Xlsx<_> =
            open_workbook_from_rs(Cursor::new(bytes)).map_err(ExtractError::MalformedWorkbook)?;

        workbook
            .load_merged_regions()
            .map_err(ExtractError::MalformedWorkbook)?;

        let sheets = workbook
            .sheets_metadata()
            .iter()
            .map(|sheet| SheetEntry {
                name: sheet.name.clone(),
                state: SheetState::from(&sheet.visible),
                is_worksheet: matches!(sheet.typ, SheetType::WorkSheet),
            })
            .collect();

        Ok(Self { workbook, sheets })
    }

    /// All sheet names in storage order, hidden ones included
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str()).collect()
    }

    pub fn sheet_state(&self, name: &str) -> Option<SheetState> {
        self.sheets
            .iter()
            .find(|sheet| sheet.name == name)
            .map(|sheet| sheet.state)
    }

    /// Names of the sheets that are fully visible worksheets, in workbook order
    pub fn visible_sheet_names(&self) -> Vec<String> {
        self.sheets
            .iter()
            .filter(|sheet| {
                if sheet.state != SheetState::Visible {
                    log::debug!("Skipping sheet '{}' ({:?})", sheet.name, sheet.state);
                    return false;
                }
                if !sheet.is_worksheet {
                    log::debug!("Skipping sheet '{}': not a worksheet", sheet.name);
                    return false;
                }
                true
            })
            .map(|sheet| sheet.name.clone())
            .collect()
    }

    /// Decode the cell grid of one sheet
    pub fn worksheet(&mut self, name: &str) -> Result<Range<Data>> {
        if self.sheet_state(name).is_none() {
            return Err(ExtractError::sheet(name, "no such sheet in workbook"));
        }
        self.workbook
            .worksheet_range(name)
            .map_err(|e| ExtractError::sheet(name, e))
    }

    /// Number of merged regions declared on a sheet
    pub fn merged_region_count(&self, name: &str) -> usize {
        self.workbook.merged_regions_by_sheet(name).len()
    }
}
