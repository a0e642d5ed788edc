//! Quotation number assignment.
//!
//! Numbers look like `CRY-2025-0042`: a configurable prefix, the calendar
//! year of creation, and a sequence that keeps counting across years.

pub mod error;
pub mod policy;

pub use error::NumberingError;
pub use policy::{
    MAX_PREFIX_LEN, SEQUENCE_WIDTH, extract_sequence, next_quotation_number, validate_prefix,
};
