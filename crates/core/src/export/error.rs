//! Export error types.

use rust_decimal::Decimal;
use rust_xlsxwriter::XlsxError;
use thiserror::Error;

/// Errors raised while rendering a quotation workbook.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The spreadsheet writer rejected an operation.
    #[error("Spreadsheet error: {0}")]
    Workbook(#[from] XlsxError),

    /// A decimal amount has no spreadsheet number representation.
    #[error("Amount {0} cannot be written to a spreadsheet cell")]
    AmountOutOfRange(Decimal),
}

impl ExportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Workbook(_) => "WORKBOOK_ERROR",
            Self::AmountOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
        }
    }
}
