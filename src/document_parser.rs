use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Result;
use crate::sheet_extractor::{SheetContent, extract_sheet};
use crate::sheet_inspector::{SheetInfo, inspect_sheet};
use crate::workbook_loader::WorkbookHandle;

/// File-level information about an extracted workbook
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentMetadata {
    pub file_name: String,
    pub total_sheets: usize,
    /// Visible sheet names in workbook order
    pub sheet_names: Vec<String>,
    pub sheets_info: IndexMap<String, SheetInfo>,
    /// When the document was generated, local time
    #[serde(rename = "last_modified")]
    pub extracted_at: String,
}

/// Normalized view of a workbook's visible, populated cells
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub metadata: DocumentMetadata,
    /// Only sheets with at least one populated row
    pub sheets: IndexMap<String, SheetContent>,
}

impl Document {
    /// Pretty JSON with non-ASCII text kept as-is
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Number of populated cells across all sheets
    pub fn cell_count(&self) -> usize {
        self.sheets
            .values()
            .flat_map(|rows| rows.iter())
            .map(|row| row.content.len())
            .sum()
    }
}

/// Extract a workbook buffer into a [`Document`].
///
/// `file_name` is only a label for `metadata.file_name`. Any failure aborts the whole
/// extraction; no partial document is returned.
pub fn process_excel_content(file_content: &[u8], file_name: &str) -> Result<Document> {
    let mut handle = WorkbookHandle::open(file_content)?;
    let visible_sheets = handle.visible_sheet_names();
    let document = assemble_document(&mut handle, visible_sheets, file_name)?;

    log::info!(
        "Extracted '{}': {} visible sheets, {} with content, {} cells",
        file_name,
        document.metadata.total_sheets,
        document.sheets.len(),
        document.cell_count()
    );
    Ok(document)
}

/// Build the document from an opened workbook and its visible sheet list
pub fn assemble_document(
    handle: &mut WorkbookHandle<'_>,
    visible_sheets: Vec<String>,
    file_name: &str,
) -> Result<Document> {
    let mut sheets_info = IndexMap::new();
    let mut sheets = IndexMap::new();

    for sheet_name in &visible_sheets {
        let range = handle.worksheet(sheet_name)?;

        sheets_info.insert(sheet_name.clone(), inspect_sheet(handle, sheet_name, &range)?);

        let content = extract_sheet(&range);
        log::debug!("Sheet '{}': {} populated rows", sheet_name, content.len());
        if !content.is_empty() {
            sheets.insert(sheet_name.clone(), content);
        }
    }

    Ok(Document {
        metadata: DocumentMetadata {
            file_name: file_name.to_string(),
            total_sheets: visible_sheets.len(),
            sheet_names: visible_sheets,
            sheets_info,
            extracted_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        },
        sheets,
    })
}
