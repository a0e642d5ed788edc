//! Quotation status and VAT percentage types.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::quotation::error::QuotationError;

/// Highest VAT percentage a quotation may carry.
pub const MAX_VAT_PERCENTAGE: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Quotation lifecycle status.
///
/// Quotations are created as `Draft` or `Sent`. Any later status is set by an
/// explicit update; there is no enforced transition graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuotationStatus {
    /// Being prepared.
    #[default]
    Draft,
    /// Sent to the customer.
    Sent,
    /// Reissued after changes.
    Revised,
    /// Accepted by the customer.
    Approved,
    /// Declined by the customer.
    Rejected,
}

impl QuotationStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Draft,
        Self::Sent,
        Self::Revised,
        Self::Approved,
        Self::Rejected,
    ];

    /// Returns the wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Sent => "SENT",
            Self::Revised => "REVISED",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Returns true if a quotation may be created with this status.
    #[must_use]
    pub const fn is_valid_initial(&self) -> bool {
        matches!(self, Self::Draft | Self::Sent)
    }
}

impl fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuotationStatus {
    type Err = QuotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QuotationError::InvalidStatus(s.to_string()))
    }
}

/// Document-level VAT percentage, bounded to `[0, MAX_VAT_PERCENTAGE]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VatPercentage(Decimal);

impl VatPercentage {
    /// Rate applied when nothing else is configured (5%).
    pub const DEFAULT: Self = Self(Decimal::from_parts(5, 0, 0, false, 0));

    /// Validates and wraps a percentage.
    ///
    /// # Errors
    ///
    /// Returns `QuotationError::VatPercentageOutOfRange` outside `[0, 20]`.
    pub fn new(value: Decimal) -> Result<Self, QuotationError> {
        if value < Decimal::ZERO || value > MAX_VAT_PERCENTAGE {
            return Err(QuotationError::VatPercentageOutOfRange {
                value,
                max: MAX_VAT_PERCENTAGE,
            });
        }
        Ok(Self(value))
    }

    /// Returns the percentage value.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for VatPercentage {
    type Error = QuotationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for VatPercentage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for VatPercentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}
