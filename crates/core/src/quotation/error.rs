//! Quotation validation errors.

use thiserror::Error;

use crate::numbering::NumberingError;
use crate::pricing::PricingError;
use crate::quotation::types::QuotationStatus;

/// Errors raised while validating quotation commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuotationError {
    /// Project name was missing or blank.
    #[error("Project name is required")]
    EmptyProjectName,

    /// A text field exceeds its stored width.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Field label.
        field: &'static str,
        /// Maximum length in characters.
        max: usize,
    },

    /// A quotation must contain at least one line item.
    #[error("At least one line item is required")]
    NoLineItems,

    /// A line item had a blank scope of work.
    #[error("Line item {index}: scope of work is required")]
    EmptyScopeOfWork {
        /// Zero-based position of the line in the request.
        index: usize,
    },

    /// New quotations start as DRAFT or SENT only.
    #[error("Quotation cannot be created with status {0}")]
    InvalidInitialStatus(QuotationStatus),

    /// Unknown status name.
    #[error("Unknown quotation status '{0}'")]
    InvalidStatus(String),

    /// VAT percentage outside the accepted business range.
    #[error("VAT percentage must be between 0 and {max}, got {value}")]
    VatPercentageOutOfRange {
        /// The rejected value.
        value: rust_decimal::Decimal,
        /// The inclusive upper bound.
        max: rust_decimal::Decimal,
    },

    /// Line or document arithmetic failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Number assignment failed.
    #[error(transparent)]
    Numbering(#[from] NumberingError),
}

impl QuotationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyProjectName => "EMPTY_PROJECT_NAME",
            Self::TooLong { .. } => "TOO_LONG",
            Self::NoLineItems => "NO_LINE_ITEMS",
            Self::EmptyScopeOfWork { .. } => "EMPTY_SCOPE_OF_WORK",
            Self::InvalidInitialStatus(_) => "INVALID_INITIAL_STATUS",
            Self::InvalidStatus(_) => "INVALID_STATUS",
            Self::VatPercentageOutOfRange { .. } => "VAT_PERCENTAGE_OUT_OF_RANGE",
            Self::Pricing(e) => e.error_code(),
            Self::Numbering(e) => e.error_code(),
        }
    }

    /// Returns true for failures caused by the request rather than stored state.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Numbering(_))
    }
}
