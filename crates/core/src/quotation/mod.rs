//! Quotation documents.
//!
//! Validated inputs for creating and updating quotations. Construction runs
//! the pricing calculator, so a [`NewQuotation`] always carries line
//! subtotals and document totals that agree with its items.
//!
//! # Modules
//!
//! - `types` - Status enum and the bounded VAT percentage
//! - `line_item` - Line item inputs and priced line items
//! - `draft` - Create and update commands
//! - `error` - Quotation validation errors

pub mod draft;
pub mod error;
pub mod line_item;
pub mod types;


pub use draft::{MAX_PROJECT_TEXT_LEN, NewQuotation, NewQuotationInput, QuotationDefaults, QuotationUpdate, QuotationUpdateInput};
pub use error::QuotationError;
pub use line_item::{LineItem, LineItemInput, build_line_items};
pub use types::{MAX_VAT_PERCENTAGE, QuotationStatus, VatPercentage};
