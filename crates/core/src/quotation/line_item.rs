//! Quotation line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::{HasSubtotal, PricingError, compute_line_subtotal, compute_line_vat_amount};
use crate::quotation::error::QuotationError;
use crate::quotation::types::VatPercentage;

/// A line item as submitted by a client.
///
/// The subtotal is never accepted from the client; it is always derived from
/// `quantity * rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemInput {
    /// What is being quoted.
    pub scope_of_work: String,
    /// Optional longer description printed under the scope.
    #[serde(default)]
    pub description: Option<String>,
    /// Quantity in the item's unit.
    pub quantity: Decimal,
    /// Price per unit.
    pub rate: Decimal,
    /// Absolute VAT amount for the line. Derived from the document
    /// percentage when absent.
    #[serde(default)]
    pub vat_rate: Option<Decimal>,
    /// Explicit position. Defaults to the line's index in the request.
    #[serde(default)]
    pub sort_order: Option<i32>,
}

/// A validated and priced line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    scope_of_work: String,
    description: Option<String>,
    quantity: Decimal,
    rate: Decimal,
    vat_rate: Decimal,
    sub_total: Decimal,
    sort_order: i32,
}

impl LineItem {
    /// Validates an input line and computes its subtotal.
    ///
    /// `index` is the line's position in the request and doubles as the
    /// default sort order. A missing `vat_rate` is computed from the
    /// document percentage at this moment and is not revisited later.
    ///
    /// # Errors
    ///
    /// Returns `QuotationError::EmptyScopeOfWork` for a blank scope and
    /// `QuotationError::Pricing` for negative amounts.
    pub fn from_input(
        input: LineItemInput,
        index: usize,
        vat_percentage: VatPercentage,
    ) -> Result<Self, QuotationError> {
        let scope_of_work = input.scope_of_work.trim().to_string();
        if scope_of_work.is_empty() {
            return Err(QuotationError::EmptyScopeOfWork { index });
        }

        let sub_total = compute_line_subtotal(input.quantity, input.rate)?;

        let vat_rate = match input.vat_rate {
            Some(amount) if amount < Decimal::ZERO => {
                return Err(PricingError::InvalidInput {
                    field: "vat_rate",
                    value: amount,
                    constraint: "must not be negative",
                }
                .into());
            }
            Some(amount) => amount,
            None => compute_line_vat_amount(sub_total, vat_percentage.value())?,
        };

        let sort_order = input
            .sort_order
            .unwrap_or_else(|| i32::try_from(index).unwrap_or(i32::MAX));

        Ok(Self {
            scope_of_work,
            description: input
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            quantity: input.quantity,
            rate: input.rate,
            vat_rate,
            sub_total,
            sort_order,
        })
    }

    /// What is being quoted.
    #[must_use]
    pub fn scope_of_work(&self) -> &str {
        &self.scope_of_work
    }

    /// Optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Quantity.
    #[must_use]
    pub const fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Price per unit.
    #[must_use]
    pub const fn rate(&self) -> Decimal {
        self.rate
    }

    /// Absolute VAT amount stored for the line.
    #[must_use]
    pub const fn vat_rate(&self) -> Decimal {
        self.vat_rate
    }

    /// Position within the quotation.
    #[must_use]
    pub const fn sort_order(&self) -> i32 {
        self.sort_order
    }
}

impl HasSubtotal for LineItem {
    fn sub_total(&self) -> Decimal {
        self.sub_total
    }
}

/// Validates and prices every input line, ordered by sort order.
///
/// Lines with equal sort order keep their request order.
///
/// # Errors
///
/// Returns `QuotationError::NoLineItems` for an empty list, otherwise the
/// first line error.
pub fn build_line_items(
    inputs: Vec<LineItemInput>,
    vat_percentage: VatPercentage,
) -> Result<Vec<LineItem>, QuotationError> {
    if inputs.is_empty() {
        return Err(QuotationError::NoLineItems);
    }

    let mut items = inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| LineItem::from_input(input, index, vat_percentage))
        .collect::<Result<Vec<_>, _>>()?;

    items.sort_by_key(LineItem::sort_order);
    Ok(items)
}
