use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Extensions of the OOXML spreadsheet containers we can decode
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xltx", "xltm"];

/// Convert a 0-based column index to its spreadsheet letters (0 -> A, 26 -> AA)
pub fn column_letter(col: u32) -> String {
    let mut n = col as u64 + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Cell address from a 0-based (row, col) position, e.g. (14, 1) -> "B15"
pub fn cell_coordinate(row: u32, col: u32) -> String {
    format!("{}{}", column_letter(col), row as u64 + 1)
}

/// Check that a path exists and carries a supported workbook extension
pub fn validate_file_path(file_path: &str) -> Result<String, String> {
    if !Path::new(file_path).exists() {
        return Err(format!("File not found: {}", file_path));
    }

    let extension = Path::new(file_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension {
        Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) => Ok(ext),
        Some(ext) => Err(format!("Unsupported file type: {}", ext)),
        None => Err("Unable to determine file type (no extension)".to_string()),
    }
}

/// Display name used as `metadata.file_name` for a file on disk
pub fn file_display_name(file_path: &str) -> String {
    Path::new(file_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.to_string())
}

/// Read a workbook from disk after validating its type and size.
///
/// Returns the display name together with the raw bytes.
pub fn read_workbook_file(file_path: &str, max_file_size_bytes: u64) -> Result<(String, Vec<u8>)> {
    validate_file_path(file_path).map_err(anyhow::Error::msg)?;

    let size = fs::metadata(file_path)
        .with_context(|| format!("Failed to read file metadata: {}", file_path))?
        .len();
    if size > max_file_size_bytes {
        anyhow::bail!(
            "File '{}' is {:.1} MB, which exceeds the {} MB limit",
            file_path,
            size as f64 / 1_048_576.0,
            max_file_size_bytes / 1_048_576
        );
    }

    let bytes = fs::read(file_path)
        .with_context(|| format!("Failed to read workbook file: {}", file_path))?;
    Ok((file_display_name(file_path), bytes))
}
