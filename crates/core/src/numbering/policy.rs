//! Next-number derivation.
//!
//! The policy is a pure function of the last issued number. It does no
//! locking: the record store must make "read last number, insert new row"
//! atomic (unique constraint plus retry).

use super::error::NumberingError;

/// Minimum number of digits in the sequence part; shorter values are zero-padded.
pub const SEQUENCE_WIDTH: usize = 4;

/// Longest accepted prefix. With a four-digit year and a full `u64`
/// sequence a number stays within 50 characters.
pub const MAX_PREFIX_LEN: usize = 20;

/// Checks a trimmed prefix against the blank and length limits.
///
/// # Errors
///
/// Returns `NumberingError::EmptyPrefix` or `NumberingError::PrefixTooLong`.
pub fn validate_prefix(prefix: &str) -> Result<&str, NumberingError> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(NumberingError::EmptyPrefix);
    }
    if prefix.chars().count() > MAX_PREFIX_LEN {
        return Err(NumberingError::PrefixTooLong(MAX_PREFIX_LEN));
    }
    Ok(prefix)
}

/// Extracts the numeric sequence from a previously issued number.
///
/// The sequence is the last run of ASCII digits in the string, so
/// `CRY-2025-0007` yields 7, `Q42` yields 42 and `0042` yields 42. Any
/// surrounding text, including an older prefix or year, is ignored.
///
/// # Errors
///
/// Returns `NumberingError::MalformedSequenceState` if the string contains no
/// digits or the digit run does not fit in a `u64`.
pub fn extract_sequence(issued: &str) -> Result<u64, NumberingError> {
    let trimmed = issued.trim_end_matches(|c: char| !c.is_ascii_digit());
    let start = trimmed
        .char_indices()
        .rev()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(0, |(idx, c)| idx + c.len_utf8());
    let digits = &trimmed[start..];

    if digits.is_empty() {
        return Err(NumberingError::MalformedSequenceState(issued.to_string()));
    }

    digits
        .parse::<u64>()
        .map_err(|_| NumberingError::MalformedSequenceState(issued.to_string()))
}

/// Derives the next quotation number.
///
/// With no prior quotation the sequence starts at 1. Otherwise the previous
/// sequence is incremented; the year is always the one passed in and the
/// sequence is not reset when the year changes.
///
/// # Errors
///
/// Returns `NumberingError::MalformedSequenceState` when `last_issued` has no
/// extractable sequence, `NumberingError::EmptyPrefix` for a blank prefix,
/// `NumberingError::PrefixTooLong` past [`MAX_PREFIX_LEN`], and
/// `NumberingError::SequenceExhausted` if the increment would overflow.
pub fn next_quotation_number(
    last_issued: Option<&str>,
    prefix: &str,
    year: i32,
) -> Result<String, NumberingError> {
    let prefix = validate_prefix(prefix)?;

    let sequence = match last_issued {
        None => 1,
        Some(issued) => {
            let previous = extract_sequence(issued)?;
            previous
                .checked_add(1)
                .ok_or(NumberingError::SequenceExhausted(previous))?
        }
    };

    Ok(format!("{prefix}-{year}-{sequence:0>SEQUENCE_WIDTH$}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_first_number() {
        assert_eq!(next_quotation_number(None, "CRY", 2025).unwrap(), "CRY-2025-0001");
    }

    #[test]
    fn test_increments_previous_sequence() {
        assert_eq!(
            next_quotation_number(Some("CRY-2025-0007"), "CRY", 2025).unwrap(),
            "CRY-2025-0008"
        );
    }

    #[test]
    fn test_sequence_not_reset_across_years() {
        assert_eq!(
            next_quotation_number(Some("CRY-2025-0007"), "CRY", 2026).unwrap(),
            "CRY-2026-0008"
        );
        assert_eq!(
            next_quotation_number(Some("CRY-2025-0042"), "CRY", 2026).unwrap(),
            "CRY-2026-0043"
        );
    }

    #[test]
    fn test_prefix_change_keeps_sequence() {
        assert_eq!(
            next_quotation_number(Some("CRY-2025-0099"), "QT", 2025).unwrap(),
            "QT-2025-0100"
        );
    }

    #[test]
    fn test_sequence_wider_than_padding() {
        assert_eq!(
            next_quotation_number(Some("CRY-2025-9999"), "CRY", 2025).unwrap(),
            "CRY-2025-10000"
        );
    }

    #[rstest]
    #[case("CRY-2025-0007", 7)]
    #[case("Q42", 42)]
    #[case("0042", 42)]
    #[case("CRY-2025-0007-rev", 7)]
    #[case("ÄÖ-12", 12)]
    #[case("7", 7)]
    fn test_extract_sequence(#[case] issued: &str, #[case] expected: u64) {
        assert_eq!(extract_sequence(issued).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("CRY-DRAFT")]
    #[case("---")]
    fn test_no_digits_is_malformed(#[case] issued: &str) {
        assert_eq!(
            next_quotation_number(Some(issued), "CRY", 2025),
            Err(NumberingError::MalformedSequenceState(issued.to_string()))
        );
    }

    #[test]
    fn test_oversized_sequence_is_malformed() {
        let issued = "CRY-2025-99999999999999999999999";
        assert!(matches!(
            extract_sequence(issued),
            Err(NumberingError::MalformedSequenceState(_))
        ));
    }

    #[test]
    fn test_exhausted_sequence() {
        let issued = format!("CRY-2025-{}", u64::MAX);
        assert_eq!(
            next_quotation_number(Some(&issued), "CRY", 2025),
            Err(NumberingError::SequenceExhausted(u64::MAX))
        );
    }

    #[test]
    fn test_blank_prefix_rejected() {
        assert_eq!(
            next_quotation_number(None, "  ", 2025),
            Err(NumberingError::EmptyPrefix)
        );
    }

    #[test]
    fn test_long_prefix_rejected() {
        assert_eq!(
            next_quotation_number(None, &"P".repeat(60), 2025),
            Err(NumberingError::PrefixTooLong(MAX_PREFIX_LEN))
        );
        assert!(next_quotation_number(None, &"P".repeat(MAX_PREFIX_LEN), 2025).is_ok());
    }

    #[test]
    fn test_longest_number_fits_column() {
        let issued = format!("CRY-2025-{}", u64::MAX - 1);
        let number = next_quotation_number(Some(&issued), &"P".repeat(MAX_PREFIX_LEN), 9999).unwrap();
        assert!(number.chars().count() <= 50, "{number}");
    }

    proptest! {
        /// Feeding each generated number back in yields consecutive sequences.
        #[test]
        fn prop_chained_numbers_are_consecutive(start in 0u64..1_000_000, year in 2000i32..2100) {
            let first = format!("CRY-{year}-{start:04}");
            let next = next_quotation_number(Some(&first), "CRY", year).unwrap();
            let after = next_quotation_number(Some(&next), "CRY", year).unwrap();

            prop_assert_eq!(extract_sequence(&next).unwrap(), start + 1);
            prop_assert_eq!(extract_sequence(&after).unwrap(), start + 2);
            let expected_prefix = format!("CRY-{}-", year);
            prop_assert!(after.starts_with(&expected_prefix));
        }
    }
}
