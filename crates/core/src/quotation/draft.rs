//! Create and update commands for quotations.

use quotedesk_shared::types::CustomerId;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::pricing::{DocumentTotals, HasSubtotal, compute_document_totals};
use crate::quotation::error::QuotationError;
use crate::quotation::line_item::{LineItem, LineItemInput, build_line_items};
use crate::quotation::types::{QuotationStatus, VatPercentage};

/// Width of the project name and site location columns.
pub const MAX_PROJECT_TEXT_LEN: usize = 255;

/// Settings-derived defaults applied when a request leaves fields out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotationDefaults {
    /// Default document VAT percentage.
    pub vat_percentage: VatPercentage,
    /// Quotation number prefix.
    pub prefix: String,
    /// Default terms and conditions text. Empty means none.
    pub terms: String,
}

/// Request body for creating a quotation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuotationInput {
    /// Customer the quotation is addressed to.
    pub customer_id: CustomerId,
    /// Project name.
    pub project_name: String,
    /// Optional site location.
    #[serde(default)]
    pub site_location: Option<String>,
    /// Initial status name, DRAFT when absent.
    #[serde(default)]
    pub status: Option<String>,
    /// Document VAT percentage. Zero is honored; absent falls back to settings.
    #[serde(default)]
    pub vat_percentage: Option<Decimal>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Terms text. Empty or absent falls back to settings.
    #[serde(default)]
    pub terms: Option<String>,
    /// Line items, at least one.
    #[serde(default)]
    pub items: Vec<LineItemInput>,
}

impl NewQuotationInput {
    /// Runs every check that does not depend on settings defaults.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`NewQuotation::new`] apart from those a
    /// settings default could cause.
    pub fn validate(&self) -> Result<(), QuotationError> {
        let vat_percentage = self
            .vat_percentage
            .map(VatPercentage::new)
            .transpose()?
            .unwrap_or(VatPercentage::DEFAULT);
        let defaults = QuotationDefaults {
            vat_percentage,
            prefix: String::new(),
            terms: String::new(),
        };
        NewQuotation::new(self.clone(), &defaults).map(|_| ())
    }
}

/// A validated, priced quotation ready to be numbered and stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuotation {
    /// Customer reference.
    pub customer_id: CustomerId,
    /// Trimmed project name.
    pub project_name: String,
    /// Site location, `None` when blank.
    pub site_location: Option<String>,
    /// Initial status, DRAFT or SENT.
    pub status: QuotationStatus,
    /// Effective VAT percentage.
    pub vat_percentage: VatPercentage,
    /// Notes, `None` when blank.
    pub notes: Option<String>,
    /// Terms, `None` when neither the request nor settings provide any.
    pub terms: Option<String>,
    /// Priced line items ordered by sort order.
    pub items: Vec<LineItem>,
    /// Totals computed from `items` and `vat_percentage`.
    pub totals: DocumentTotals,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn bounded(field: &'static str, value: Option<String>) -> Result<Option<String>, QuotationError> {
    match value {
        Some(v) if v.chars().count() > MAX_PROJECT_TEXT_LEN => Err(QuotationError::TooLong {
            field,
            max: MAX_PROJECT_TEXT_LEN,
        }),
        other => Ok(other),
    }
}

fn parse_status(value: Option<String>) -> Result<Option<QuotationStatus>, QuotationError> {
    value.as_deref().map(str::parse::<QuotationStatus>).transpose()
}

impl NewQuotation {
    /// Validates a create request and computes its totals.
    ///
    /// # Errors
    ///
    /// Returns a `QuotationError` for a blank project name, a project name or
    /// site location longer than the stored column, a missing or invalid line, a status other than DRAFT/SENT, or a VAT percentage
    /// outside `[0, 20]`.
    pub fn new(input: NewQuotationInput, defaults: &QuotationDefaults) -> Result<Self, QuotationError> {
        let project_name = non_blank(Some(input.project_name)).ok_or(QuotationError::EmptyProjectName)?;
        let project_name = bounded("Project name", Some(project_name))?.unwrap_or_default();
        let site_location = bounded("Site location", non_blank(input.site_location))?;

        let status = parse_status(input.status)?.unwrap_or_default();
        if !status.is_valid_initial() {
            return Err(QuotationError::InvalidInitialStatus(status));
        }

        let vat_percentage = match input.vat_percentage {
            Some(value) => VatPercentage::new(value)?,
            None => defaults.vat_percentage,
        };

        let items = build_line_items(input.items, vat_percentage)?;
        let totals = compute_document_totals(&items, vat_percentage.value())?;

        let terms = non_blank(input.terms).or_else(|| non_blank(Some(defaults.terms.clone())));

        Ok(Self {
            customer_id: input.customer_id,
            project_name,
            site_location,
            status,
            vat_percentage,
            notes: non_blank(input.notes),
            terms,
            items,
            totals,
        })
    }
}

/// Request body for a partial quotation update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotationUpdateInput {
    /// New customer.
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    /// New project name.
    #[serde(default)]
    pub project_name: Option<String>,
    /// New site location; an empty string clears it.
    #[serde(default)]
    pub site_location: Option<String>,
    /// New status name.
    #[serde(default)]
    pub status: Option<String>,
    /// New VAT percentage.
    #[serde(default)]
    pub vat_percentage: Option<Decimal>,
    /// New notes; an empty string clears them.
    #[serde(default)]
    pub notes: Option<String>,
    /// New terms; an empty string clears them.
    #[serde(default)]
    pub terms: Option<String>,
    /// Replacement line items.
    #[serde(default)]
    pub items: Option<Vec<LineItemInput>>,
}

/// A validated partial update.
///
/// `None` leaves a field unchanged. For clearable text fields `Some(None)`
/// sets the column to null.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotationUpdate {
    /// New customer.
    pub customer_id: Option<CustomerId>,
    /// New project name.
    pub project_name: Option<String>,
    /// New site location.
    pub site_location: Option<Option<String>>,
    /// New status.
    pub status: Option<QuotationStatus>,
    /// New VAT percentage.
    pub vat_percentage: Option<VatPercentage>,
    /// New notes.
    pub notes: Option<Option<String>>,
    /// New terms.
    pub terms: Option<Option<String>>,
    /// Replacement items, priced with the effective percentage.
    pub items: Option<Vec<LineItem>>,
}

impl QuotationUpdate {
    /// Validates an update request against the quotation's current VAT
    /// percentage.
    ///
    /// Replacement items without an explicit `vat_rate` are priced with the
    /// new percentage when one is given, otherwise the current one.
    ///
    /// # Errors
    ///
    /// Returns a `QuotationError` for a blank or over-long project name, an
    /// over-long site location, an empty or invalid item list, an unknown status, or an out-of-range percentage.
    pub fn new(input: QuotationUpdateInput, current_vat: VatPercentage) -> Result<Self, QuotationError> {
        let project_name = match input.project_name {
            Some(name) => {
                let name = non_blank(Some(name)).ok_or(QuotationError::EmptyProjectName)?;
                bounded("Project name", Some(name))?
            }
            None => None,
        };
        let site_location = input
            .site_location
            .map(|v| bounded("Site location", non_blank(Some(v))))
            .transpose()?;

        let vat_percentage = input.vat_percentage.map(VatPercentage::new).transpose()?;
        let effective_vat = vat_percentage.unwrap_or(current_vat);

        let items = input
            .items
            .map(|items| build_line_items(items, effective_vat))
            .transpose()?;

        Ok(Self {
            customer_id: input.customer_id,
            project_name,
            site_location,
            status: parse_status(input.status)?,
            vat_percentage,
            notes: input.notes.map(|v| non_blank(Some(v))),
            terms: input.terms.map(|v| non_blank(Some(v))),
            items,
        })
    }

    /// Returns true when the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Recomputes document totals when items or the percentage change.
    ///
    /// New items are totalled when present. A percentage-only change
    /// re-totals `existing_items`, whose stored per-line VAT amounts are
    /// left as they are. Returns `None` when totals are unaffected.
    ///
    /// # Errors
    ///
    /// Returns `QuotationError::Pricing` if the arithmetic fails.
    pub fn resolve_totals<T: HasSubtotal>(
        &self,
        existing_items: &[T],
        current_vat: VatPercentage,
    ) -> Result<Option<DocumentTotals>, QuotationError> {
        let vat = self.vat_percentage.unwrap_or(current_vat);
        let totals = match (&self.items, self.vat_percentage) {
            (Some(items), _) => compute_document_totals(items, vat.value())?,
            (None, Some(_)) => compute_document_totals(existing_items, vat.value())?,
            (None, None) => return Ok(None),
        };
        Ok(Some(totals))
    }
}
