//! Numbering error types.

use thiserror::Error;

/// Errors raised while deriving the next quotation number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberingError {
    /// The last issued number has no usable numeric sequence.
    #[error("Malformed sequence state: cannot extract a sequence from '{0}'")]
    MalformedSequenceState(String),

    /// The sequence cannot be incremented any further.
    #[error("Quotation sequence exhausted after {0}")]
    SequenceExhausted(u64),

    /// The numbering prefix is blank.
    #[error("Quotation number prefix cannot be empty")]
    EmptyPrefix,

    /// The prefix would push numbers past the stored column width.
    #[error("Quotation number prefix must be at most {0} characters")]
    PrefixTooLong(usize),
}

impl NumberingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedSequenceState(_) => "MALFORMED_SEQUENCE_STATE",
            Self::SequenceExhausted(_) => "SEQUENCE_EXHAUSTED",
            Self::EmptyPrefix => "EMPTY_PREFIX",
            Self::PrefixTooLong(_) => "PREFIX_TOO_LONG",
        }
    }
}
