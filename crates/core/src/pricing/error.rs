//! Pricing error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the pricing calculator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// A numeric input was negative or outside its allowed range.
    #[error("Invalid {field}: {value} ({constraint})")]
    InvalidInput {
        /// Name of the offending input.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
        /// The constraint that was violated.
        constraint: &'static str,
    },

    /// The result does not fit in a decimal.
    #[error("Arithmetic overflow while computing {0}")]
    Overflow(&'static str),
}

impl PricingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::Overflow(_) => "ARITHMETIC_OVERFLOW",
        }
    }
}
