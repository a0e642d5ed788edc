//! Directory validation errors.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while validating customers and catalog items.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// A required text field was blank.
    #[error("{0} is required")]
    Required(&'static str),

    /// Email address is not well formed.
    #[error("Invalid email address '{0}'")]
    InvalidEmail(String),

    /// Unknown item category.
    #[error("Unknown item category '{0}'")]
    InvalidCategory(String),

    /// A text field exceeds its stored width.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Field label.
        field: &'static str,
        /// Maximum length in characters.
        max: usize,
    },

    /// Catalog rate below zero.
    #[error("Default rate must not be negative, got {0}")]
    NegativeRate(Decimal),
}

impl DirectoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Required(_) => "REQUIRED_FIELD",
            Self::InvalidEmail(_) => "INVALID_EMAIL",
            Self::InvalidCategory(_) => "INVALID_CATEGORY",
            Self::NegativeRate(_) => "NEGATIVE_RATE",
            Self::TooLong { .. } => "TOO_LONG",
        }
    }
}

/// Rejects values longer than `max` characters.
pub(crate) fn ensure_max_len(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), DirectoryError> {
    match value {
        Some(v) if v.chars().count() > max => Err(DirectoryError::TooLong { field, max }),
        _ => Ok(()),
    }
}
