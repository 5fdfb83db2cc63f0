/// Workbook Extractor MCP - A Model Context Protocol server that turns Excel workbooks into JSON
/// Reads xlsx/xlsm buffers, keeps visible sheets and populated cells only

pub mod cell_normalizer;
pub mod config;
pub mod document_parser;
pub mod error;
pub mod logging;
pub mod mcp_handler;
pub mod session;
pub mod shared_utils;
pub mod sheet_extractor;
pub mod sheet_inspector;
pub mod workbook_loader;

/// Re-export the WorkbookReader for direct usage
pub use mcp_handler::{WorkbookReader, start_server};

/// Re-export main functionality
pub use document_parser::{
    Document,
    DocumentMetadata,
    assemble_document,
    process_excel_content,
};
pub use error::ExtractError;

/// Re-export the extraction building blocks
pub use cell_normalizer::{CellValue, normalize_cell};
pub use sheet_extractor::{CellRecord, RowRecord, SheetContent, extract_sheet};
pub use sheet_inspector::{SheetInfo, inspect_sheet};
pub use workbook_loader::{SheetState, WorkbookHandle};

/// Re-export session handling
pub use session::{AppendOutcome, FilesContext, WorkbookSession};

/// Re-export configuration and shared utilities
pub use config::ServerConfig;
pub use shared_utils::{
    cell_coordinate,
    column_letter,
    file_display_name,
    read_workbook_file,
    validate_file_path,
};
