//! Quotation spreadsheet export.
//!
//! Renders a stored quotation as an `.xlsx` workbook. The exporter only
//! formats what it is given; totals come from the stored quotation and are
//! never recomputed here.

pub mod document;
pub mod error;
pub mod workbook;

pub use document::{CompanyProfile, CustomerDetails, ExportLine, QuotationDocument};
pub use error::ExportError;
pub use workbook::{XLSX_CONTENT_TYPE, download_filename, render_quotation};
