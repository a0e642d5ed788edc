//! Property-based tests for the pricing calculator.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::calculator::{compute_document_totals, compute_line_subtotal};
use super::error::PricingError;

/// Strategy for quantities from 0 to 10,000.000 with three decimals.
fn quantity() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|milli| Decimal::new(milli, 3))
}

/// Strategy for rates from 0.00 to 1,000,000.00.
fn rate() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for VAT percentages in the business range 0..=20 with two decimals.
fn vat_percentage() -> impl Strategy<Value = Decimal> {
    (0i64..=2_000i64).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

/// Strategy for non-empty lists of (quantity, rate) pairs.
fn lines() -> impl Strategy<Value = Vec<(Decimal, Decimal)>> {
    prop::collection::vec((quantity(), rate()), 1..20)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Line subtotal is the exact product of quantity and rate.
    #[test]
    fn prop_line_subtotal_is_exact(q in quantity(), r in rate()) {
        prop_assert_eq!(compute_line_subtotal(q, r).unwrap(), q * r);
    }

    /// Negative quantities are rejected, never clamped.
    #[test]
    fn prop_negative_quantity_rejected(milli in 1i64..10_000_000i64, r in rate()) {
        let result = compute_line_subtotal(Decimal::new(-milli, 3), r);
        let rejected = matches!(result, Err(PricingError::InvalidInput { field: "quantity", .. }));
        prop_assert!(rejected, "got {:?}", result);
    }

    /// Negative rates are rejected, never clamped.
    #[test]
    fn prop_negative_rate_rejected(q in quantity(), cents in 1i64..100_000_000i64) {
        let result = compute_line_subtotal(q, Decimal::new(-cents, 2));
        let rejected = matches!(result, Err(PricingError::InvalidInput { field: "rate", .. }));
        prop_assert!(rejected, "got {:?}", result);
    }

    /// Grand total always equals subtotal plus VAT amount.
    #[test]
    fn prop_total_is_subtotal_plus_vat(items in lines(), pct in vat_percentage()) {
        let subtotals: Vec<Decimal> = items
            .iter()
            .map(|(q, r)| compute_line_subtotal(*q, *r).unwrap())
            .collect();

        let totals = compute_document_totals(&subtotals, pct).unwrap();

        prop_assert_eq!(totals.subtotal, subtotals.iter().copied().sum::<Decimal>());
        prop_assert_eq!(totals.vat_amount, totals.subtotal * pct / Decimal::ONE_HUNDRED);
        prop_assert_eq!(totals.total, totals.subtotal + totals.vat_amount);
    }

    /// Computing totals twice over the same input gives the same answer.
    #[test]
    fn prop_document_totals_idempotent(items in lines(), pct in vat_percentage()) {
        let subtotals: Vec<Decimal> = items.iter().map(|(q, r)| q * r).collect();

        let first = compute_document_totals(&subtotals, pct).unwrap();
        let second = compute_document_totals(&subtotals, pct).unwrap();

        prop_assert_eq!(first, second);
    }

    /// Line order does not affect document totals.
    #[test]
    fn prop_document_totals_order_independent(items in lines(), pct in vat_percentage()) {
        let subtotals: Vec<Decimal> = items.iter().map(|(q, r)| q * r).collect();
        let mut reversed = subtotals.clone();
        reversed.reverse();

        prop_assert_eq!(
            compute_document_totals(&subtotals, pct).unwrap(),
            compute_document_totals(&reversed, pct).unwrap()
        );
    }
}
