use calamine::XlsxError;
use thiserror::Error;

/// Errors raised while turning a workbook buffer into a [`Document`](crate::Document)
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The buffer is not a readable OOXML spreadsheet container
    #[error("malformed workbook: {0}")]
    MalformedWorkbook(#[source] XlsxError),

    /// A sheet listed by the workbook could not be read
    #[error("sheet '{name}' could not be read: {reason}")]
    InvalidSheetState { name: String, reason: String },
}

impl ExtractError {
    pub(crate) fn sheet(name: &str, reason: impl ToString) -> Self {
        ExtractError::InvalidSheetState {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True when the input itself could not be decoded
    pub fn is_malformed(&self) -> bool {
        matches!(self, ExtractError::MalformedWorkbook(_))
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
