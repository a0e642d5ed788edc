//! Customer records.

use serde::Deserialize;
use validator::ValidateEmail;

use super::error::{DirectoryError, ensure_max_len};

/// Width of the name, contact and email columns.
pub const MAX_CUSTOMER_TEXT_LEN: usize = 255;
/// Width of the phone column.
pub const MAX_PHONE_LEN: usize = 50;

/// Request body for creating or replacing a customer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerInput {
    /// Company name.
    pub company_name: String,
    /// Contact person.
    #[serde(default)]
    pub contact_person: Option<String>,
    /// Phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Email; an empty string counts as absent.
    #[serde(default)]
    pub email: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
}

/// A validated customer. Blank optional fields are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    /// Company name.
    pub company_name: String,
    /// Contact person.
    pub contact_person: Option<String>,
    /// Phone.
    pub phone: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl NewCustomer {
    /// Validates a customer request.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Required` for a blank company name,
    /// `DirectoryError::InvalidEmail` for a malformed email and
    /// `DirectoryError::TooLong` when a field exceeds its column width.
    pub fn new(input: CustomerInput) -> Result<Self, DirectoryError> {
        let company_name =
            optional(Some(input.company_name)).ok_or(DirectoryError::Required("Company name"))?;

        let email = optional(input.email);
        if let Some(invalid) = email.as_ref().filter(|e| !e.validate_email()) {
            return Err(DirectoryError::InvalidEmail(invalid.clone()));
        }

        let contact_person = optional(input.contact_person);
        let phone = optional(input.phone);

        ensure_max_len("Company name", Some(&company_name), MAX_CUSTOMER_TEXT_LEN)?;
        ensure_max_len("Contact person", contact_person.as_deref(), MAX_CUSTOMER_TEXT_LEN)?;
        ensure_max_len("Phone", phone.as_deref(), MAX_PHONE_LEN)?;
        ensure_max_len("Email", email.as_deref(), MAX_CUSTOMER_TEXT_LEN)?;

        Ok(Self {
            company_name,
            contact_person,
            phone,
            email,
            address: optional(input.address),
        })
    }
}
