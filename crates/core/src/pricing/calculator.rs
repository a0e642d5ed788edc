//! Line and document total computation.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::error::PricingError;

/// Upper bound accepted for a VAT percentage by the calculator itself.
///
/// Callers usually apply a narrower business limit on top of this.
const MAX_PERCENTAGE: Decimal = Decimal::ONE_HUNDRED;

/// Decimal places shown to users.
const DISPLAY_DECIMAL_PLACES: u32 = 2;

/// Subtotal, VAT amount and grand total of a quotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentTotals {
    /// Sum of all line subtotals.
    pub subtotal: Decimal,
    /// `subtotal * vat_percentage / 100`.
    pub vat_amount: Decimal,
    /// `subtotal + vat_amount`.
    pub total: Decimal,
}

impl DocumentTotals {
    /// Totals of a document with no lines.
    pub const ZERO: Self = Self {
        subtotal: Decimal::ZERO,
        vat_amount: Decimal::ZERO,
        total: Decimal::ZERO,
    };
}

/// Anything that carries a stored line subtotal.
pub trait HasSubtotal {
    /// The line subtotal (`quantity * rate`).
    fn sub_total(&self) -> Decimal;
}

impl HasSubtotal for Decimal {
    fn sub_total(&self) -> Decimal {
        *self
    }
}

impl<T: HasSubtotal + ?Sized> HasSubtotal for &T {
    fn sub_total(&self) -> Decimal {
        (**self).sub_total()
    }
}

fn ensure_non_negative(field: &'static str, value: Decimal) -> Result<(), PricingError> {
    if value < Decimal::ZERO {
        return Err(PricingError::InvalidInput {
            field,
            value,
            constraint: "must not be negative",
        });
    }
    Ok(())
}

fn ensure_percentage(value: Decimal) -> Result<(), PricingError> {
    if value < Decimal::ZERO || value > MAX_PERCENTAGE {
        return Err(PricingError::InvalidInput {
            field: "vat_percentage",
            value,
            constraint: "must be between 0 and 100",
        });
    }
    Ok(())
}

/// Computes `quantity * rate` at full precision.
///
/// # Errors
///
/// Returns `PricingError::InvalidInput` if either input is negative.
pub fn compute_line_subtotal(quantity: Decimal, rate: Decimal) -> Result<Decimal, PricingError> {
    ensure_non_negative("quantity", quantity)?;
    ensure_non_negative("rate", rate)?;

    quantity
        .checked_mul(rate)
        .ok_or(PricingError::Overflow("line subtotal"))
}

/// Computes the VAT amount of a single line from a percentage.
///
/// The result is stored on the line as an absolute amount and is not
/// revisited when the document percentage changes later.
///
/// # Errors
///
/// Returns `PricingError::InvalidInput` if the subtotal is negative or the
/// percentage is outside `[0, 100]`.
pub fn compute_line_vat_amount(
    subtotal: Decimal,
    vat_percentage: Decimal,
) -> Result<Decimal, PricingError> {
    ensure_non_negative("subtotal", subtotal)?;
    ensure_percentage(vat_percentage)?;
    percentage_of(subtotal, vat_percentage, "line VAT amount")
}

/// Computes document subtotal, VAT amount and grand total.
///
/// An empty slice yields [`DocumentTotals::ZERO`]; requiring at least one
/// line is the caller's policy.
///
/// # Errors
///
/// Returns `PricingError::InvalidInput` if any line subtotal is negative or
/// the percentage is outside `[0, 100]`.
pub fn compute_document_totals<T: HasSubtotal>(
    items: &[T],
    vat_percentage: Decimal,
) -> Result<DocumentTotals, PricingError> {
    ensure_percentage(vat_percentage)?;

    let mut subtotal = Decimal::ZERO;
    for item in items {
        let line = item.sub_total();
        ensure_non_negative("sub_total", line)?;
        subtotal = subtotal
            .checked_add(line)
            .ok_or(PricingError::Overflow("document subtotal"))?;
    }

    let vat_amount = percentage_of(subtotal, vat_percentage, "document VAT amount")?;
    let total = subtotal
        .checked_add(vat_amount)
        .ok_or(PricingError::Overflow("document total"))?;

    Ok(DocumentTotals {
        subtotal,
        vat_amount,
        total,
    })
}

/// Rounds an amount to two decimal places for presentation.
#[must_use]
pub fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(DISPLAY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

fn percentage_of(
    amount: Decimal,
    percentage: Decimal,
    what: &'static str,
) -> Result<Decimal, PricingError> {
    amount
        .checked_mul(percentage)
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(PricingError::Overflow(what))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_line_subtotal_is_exact_product() {
        assert_eq!(compute_line_subtotal(dec!(10), dec!(280.00)).unwrap(), dec!(2800.00));
        assert_eq!(compute_line_subtotal(dec!(5), dec!(85.00)).unwrap(), dec!(425.00));
        // No rounding at the line level.
        assert_eq!(
            compute_line_subtotal(dec!(1.333), dec!(2.125)).unwrap(),
            dec!(2.832625)
        );
    }

    #[test]
    fn test_line_subtotal_zero_inputs() {
        assert_eq!(compute_line_subtotal(dec!(0), dec!(100)).unwrap(), Decimal::ZERO);
        assert_eq!(compute_line_subtotal(dec!(3), dec!(0)).unwrap(), Decimal::ZERO);
    }

    #[rstest]
    #[case(dec!(-1), dec!(100), "quantity")]
    #[case(dec!(1), dec!(-0.01), "rate")]
    #[case(dec!(-2), dec!(-2), "quantity")]
    fn test_line_subtotal_rejects_negative(
        #[case] quantity: Decimal,
        #[case] rate: Decimal,
        #[case] expected_field: &str,
    ) {
        match compute_line_subtotal(quantity, rate) {
            Err(PricingError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_line_vat_amount() {
        assert_eq!(compute_line_vat_amount(dec!(2800.00), dec!(5)).unwrap(), dec!(140));
        assert_eq!(compute_line_vat_amount(dec!(425.00), dec!(5)).unwrap(), dec!(21.25));
        assert_eq!(compute_line_vat_amount(dec!(425.00), dec!(0)).unwrap(), Decimal::ZERO);
    }

    #[rstest]
    #[case(dec!(-0.5))]
    #[case(dec!(100.01))]
    fn test_line_vat_amount_rejects_bad_percentage(#[case] pct: Decimal) {
        assert!(matches!(
            compute_line_vat_amount(dec!(100), pct),
            Err(PricingError::InvalidInput { field: "vat_percentage", .. })
        ));
    }

    #[test]
    fn test_document_totals_end_to_end() {
        let lines = [
            compute_line_subtotal(dec!(10), dec!(280.00)).unwrap(),
            compute_line_subtotal(dec!(5), dec!(85.00)).unwrap(),
        ];

        let totals = compute_document_totals(&lines, dec!(5)).unwrap();

        assert_eq!(totals.subtotal, dec!(3225.00));
        assert_eq!(totals.vat_amount, dec!(161.25));
        assert_eq!(totals.total, dec!(3386.25));
    }

    #[test]
    fn test_document_totals_empty() {
        let totals = compute_document_totals::<Decimal>(&[], dec!(5)).unwrap();
        assert_eq!(totals, DocumentTotals::ZERO);
    }

    #[test]
    fn test_document_totals_rejects_negative_line() {
        let result = compute_document_totals(&[dec!(10), dec!(-1)], dec!(5));
        assert!(matches!(
            result,
            Err(PricingError::InvalidInput { field: "sub_total", .. })
        ));
    }

    #[test]
    fn test_document_totals_rejects_out_of_range_percentage() {
        assert!(compute_document_totals(&[dec!(10)], dec!(101)).is_err());
        assert!(compute_document_totals(&[dec!(10)], dec!(-1)).is_err());
    }

    #[test]
    fn test_document_totals_accepts_references() {
        let lines = vec![dec!(1.10), dec!(2.20)];
        let refs: Vec<&Decimal> = lines.iter().collect();
        let totals = compute_document_totals(&refs, dec!(10)).unwrap();
        assert_eq!(totals.subtotal, dec!(3.30));
        assert_eq!(totals.vat_amount, dec!(0.33));
    }

    #[test]
    fn test_overflow_is_reported() {
        let result = compute_line_subtotal(Decimal::MAX, dec!(2));
        assert_eq!(result, Err(PricingError::Overflow("line subtotal")));
    }

    #[rstest]
    #[case(dec!(161.245), dec!(161.25))]
    #[case(dec!(161.244), dec!(161.24))]
    #[case(dec!(0.005), dec!(0.01))]
    #[case(dec!(3386.25), dec!(3386.25))]
    fn test_round_for_display(#[case] amount: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_for_display(amount), expected);
    }

    #[test]
    fn test_error_codes() {
        let err = compute_line_subtotal(dec!(-1), dec!(100)).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert_eq!(PricingError::Overflow("x").error_code(), "ARITHMETIC_OVERFLOW");
    }
}
