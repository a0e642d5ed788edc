//! Core business logic for QuoteDesk.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `pricing` - Line subtotals and document totals
//! - `numbering` - Quotation number assignment
//! - `quotation` - Validated quotation commands
//! - `directory` - Customers and the item catalog
//! - `export` - Spreadsheet rendering of quotations

pub mod directory;
pub mod export;
pub mod numbering;
pub mod pricing;
pub mod quotation;
