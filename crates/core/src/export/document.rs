//! Export input types.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use quotedesk_shared::CompanyConfig;
use rust_decimal::Decimal;

use crate::pricing::DocumentTotals;

/// Company details printed in the workbook header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyProfile {
    /// Company name.
    pub name: String,
    /// Postal address.
    pub address: String,
    /// Contact phone.
    pub phone: String,
    /// Contact email.
    pub email: String,
    /// Currency label for money cells, e.g. `AED`.
    pub currency: String,
    /// Local offset used for printed dates.
    pub utc_offset: FixedOffset,
}

impl From<&CompanyConfig> for CompanyProfile {
    fn from(config: &CompanyConfig) -> Self {
        Self {
            name: config.name.clone(),
            address: config.address.clone(),
            phone: config.phone.clone(),
            email: config.email.clone(),
            currency: config.currency.clone(),
            utc_offset: FixedOffset::east_opt(config.utc_offset_minutes.saturating_mul(60))
                .unwrap_or_else(|| Utc.fix()),
        }
    }
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self::from(&CompanyConfig::default())
    }
}

/// Customer block of the workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDetails {
    /// Customer company name.
    pub company_name: String,
    /// Contact person, printed as "Attn".
    pub contact_person: Option<String>,
    /// Phone.
    pub phone: Option<String>,
    /// Email.
    pub email: Option<String>,
}

/// One stored line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportLine {
    /// Scope of work.
    pub scope_of_work: String,
    /// Optional description.
    pub description: Option<String>,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit rate.
    pub rate: Decimal,
    /// Stored line VAT amount.
    pub vat_rate: Decimal,
    /// Stored line subtotal.
    pub sub_total: Decimal,
}

impl ExportLine {
    /// Text of the scope cell: scope, then a blank line and the description.
    #[must_use]
    pub fn scope_text(&self) -> String {
        match self.description.as_deref().filter(|d| !d.is_empty()) {
            Some(description) => format!("{}\n\n{description}", self.scope_of_work),
            None => self.scope_of_work.clone(),
        }
    }
}

/// A fully resolved quotation ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotationDocument {
    /// Assigned quotation number.
    pub quotation_number: String,
    /// Creation timestamp, printed as the quotation date.
    pub created_at: DateTime<Utc>,
    /// Project name.
    pub project_name: String,
    /// Site location.
    pub site_location: Option<String>,
    /// Customer details.
    pub customer: CustomerDetails,
    /// Lines in display order.
    pub items: Vec<ExportLine>,
    /// Document VAT percentage.
    pub vat_percentage: Decimal,
    /// Stored totals.
    pub totals: DocumentTotals,
    /// Terms and conditions.
    pub terms: Option<String>,
    /// Name printed under "Prepared By".
    pub prepared_by: Option<String>,
}

impl QuotationDocument {
    /// Label of the VAT total row, e.g. `VAT (5%):`.
    #[must_use]
    pub fn vat_label(&self) -> String {
        format!("VAT ({}%):", self.vat_percentage.normalize())
    }

    /// Quotation date as `dd/mm/yyyy` in the given local offset.
    #[must_use]
    pub fn date_label(&self, offset: FixedOffset) -> String {
        self.created_at.with_timezone(&offset).format("%d/%m/%Y").to_string()
    }
}
