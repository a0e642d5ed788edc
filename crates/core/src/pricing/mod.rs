//! Quotation pricing.
//!
//! Turns line-item quantities and rates into line subtotals, and line
//! subtotals plus a document VAT percentage into document totals. Every
//! function is pure; nothing here rounds except [`round_for_display`].

pub mod calculator;
pub mod error;

#[cfg(test)]
mod calculator_props;

pub use calculator::{
    DocumentTotals, HasSubtotal, compute_document_totals, compute_line_subtotal,
    compute_line_vat_amount, round_for_display,
};
pub use error::PricingError;
