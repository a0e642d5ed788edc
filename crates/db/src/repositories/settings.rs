//! Settings repository for key/value configuration stored in the database.

use std::collections::BTreeMap;

use quotedesk_core::numbering::validate_prefix;
use quotedesk_core::quotation::{QuotationDefaults, QuotationError, VatPercentage};
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};
use tracing::{info, warn};

use crate::entities::settings;

/// Key of the default VAT percentage.
pub const VAT_PERCENTAGE_KEY: &str = "vat_percentage";
/// Key of the quotation number prefix.
pub const QUOTATION_PREFIX_KEY: &str = "quotation_prefix";
/// Key of the default terms and conditions.
pub const QUOTATION_TERMS_KEY: &str = "quotation_terms";

/// Width of the key column.
pub const MAX_KEY_LEN: usize = 100;

/// Prefix used when the setting is missing or blank.
pub const DEFAULT_QUOTATION_PREFIX: &str = "CRY";

/// Error types for settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Setting key was blank.
    #[error("Setting key is required")]
    EmptyKey,

    /// Setting key exceeds the key column.
    #[error("Setting key must be at most {MAX_KEY_LEN} characters")]
    KeyTooLong,

    /// Value is not acceptable for a well-known key.
    #[error("Invalid value '{value}' for setting '{key}': {reason}")]
    InvalidValue {
        /// Setting key.
        key: String,
        /// Rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Settings repository.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    db: DatabaseConnection,
}

/// Checks values of well-known keys before they are stored.
fn validate_value(key: &str, value: &str) -> Result<(), SettingsError> {
    let invalid = |reason: String| SettingsError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason,
    };

    match key {
        VAT_PERCENTAGE_KEY => {
            let parsed: Decimal = value
                .trim()
                .parse()
                .map_err(|_| invalid("not a number".to_string()))?;
            VatPercentage::new(parsed).map_err(|e: QuotationError| invalid(e.to_string()))?;
        }
        QUOTATION_PREFIX_KEY => {
            validate_prefix(value).map_err(|e| invalid(e.to_string()))?;
        }
        _ => {}
    }
    Ok(())
}

/// Resolves quotation defaults from a settings map.
///
/// Missing or unreadable values fall back to 5%, `CRY` and no terms. A
/// stored prefix that is blank or too long also falls back to `CRY`.
#[must_use]
pub fn resolve_defaults(values: &BTreeMap<String, String>) -> QuotationDefaults {
    let vat_percentage = values
        .get(VAT_PERCENTAGE_KEY)
        .and_then(|raw| {
            let parsed = raw.trim().parse::<Decimal>().ok().and_then(|v| VatPercentage::new(v).ok());
            if parsed.is_none() {
                warn!(value = %raw, "Ignoring unreadable vat_percentage setting");
            }
            parsed
        })
        .unwrap_or(VatPercentage::DEFAULT);

    let prefix = values
        .get(QUOTATION_PREFIX_KEY)
        .and_then(|raw| match validate_prefix(raw) {
            Ok(prefix) => Some(prefix.to_string()),
            Err(e) => {
                warn!(value = %raw, error = %e, "Ignoring unusable quotation_prefix setting");
                None
            }
        })
        .unwrap_or_else(|| DEFAULT_QUOTATION_PREFIX.to_string());

    let terms = values.get(QUOTATION_TERMS_KEY).cloned().unwrap_or_default();

    QuotationDefaults {
        vat_percentage,
        prefix,
        terms,
    }
}

impl SettingsRepository {
    /// Creates a new settings repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Reads a single setting value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(settings::Entity::find_by_id(key.to_string())
            .one(&self.db)
            .await?
            .map(|s| s.value))
    }

    /// Returns every setting as a key to value map.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<BTreeMap<String, String>, SettingsError> {
        let rows = settings::Entity::find()
            .order_by_asc(settings::Column::Key)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|s| (s.key, s.value)).collect())
    }

    /// Inserts or updates a setting.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidValue` when a well-known key gets an
    /// unusable value, or a database error.
    pub async fn upsert(&self, key: &str, value: &str) -> Result<settings::Model, SettingsError> {
        self.upsert_with_description(key, value, None).await
    }

    /// Inserts or updates a setting, storing a description on insert.
    ///
    /// # Errors
    ///
    /// Same as [`SettingsRepository::upsert`].
    pub async fn upsert_with_description(
        &self,
        key: &str,
        value: &str,
        description: Option<&str>,
    ) -> Result<settings::Model, SettingsError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(SettingsError::EmptyKey);
        }
        if key.chars().count() > MAX_KEY_LEN {
            return Err(SettingsError::KeyTooLong);
        }
        validate_value(key, value)?;

        let setting = settings::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            description: Set(description.map(str::to_string)),
            updated_at: Set(chrono::Utc::now().into()),
        };

        let saved = settings::Entity::insert(setting)
            .on_conflict(
                OnConflict::column(settings::Column::Key)
                    .update_columns([settings::Column::Value, settings::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await?;

        info!(key = %saved.key, "Setting saved");
        Ok(saved)
    }

    /// Resolves the defaults applied to new quotations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn quotation_defaults(&self) -> Result<QuotationDefaults, SettingsError> {
        Ok(resolve_defaults(&self.list().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_empty() {
        let defaults = resolve_defaults(&BTreeMap::new());
        assert_eq!(defaults.vat_percentage.value(), dec!(5));
        assert_eq!(defaults.prefix, "CRY");
        assert_eq!(defaults.terms, "");
    }

    #[test]
    fn test_defaults_from_values() {
        let defaults = resolve_defaults(&map(&[
            ("vat_percentage", "0"),
            ("quotation_prefix", " QT "),
            ("quotation_terms", "Net 30"),
        ]));
        assert_eq!(defaults.vat_percentage.value(), Decimal::ZERO);
        assert_eq!(defaults.prefix, "QT");
        assert_eq!(defaults.terms, "Net 30");
    }

    #[test]
    fn test_unreadable_values_fall_back() {
        let defaults = resolve_defaults(&map(&[
            ("vat_percentage", "five"),
            ("quotation_prefix", "  "),
        ]));
        assert_eq!(defaults.vat_percentage.value(), dec!(5));
        assert_eq!(defaults.prefix, "CRY");

        let defaults = resolve_defaults(&map(&[("vat_percentage", "35")]));
        assert_eq!(defaults.vat_percentage.value(), dec!(5));

        let long_prefix = "Q".repeat(45);
        let defaults = resolve_defaults(&map(&[("quotation_prefix", long_prefix.as_str())]));
        assert_eq!(defaults.prefix, "CRY");
    }

    #[tokio::test]
    async fn test_upsert_rejects_before_touching_database() {
        let repo = SettingsRepository::new(DatabaseConnection::default());

        let long_prefix = "Q".repeat(45);
        assert!(matches!(
            repo.upsert(QUOTATION_PREFIX_KEY, &long_prefix).await,
            Err(SettingsError::InvalidValue { .. })
        ));
        assert!(matches!(
            repo.upsert(&"k".repeat(MAX_KEY_LEN + 1), "x").await,
            Err(SettingsError::KeyTooLong)
        ));
    }

    #[test]
    fn test_validate_value() {
        assert!(validate_value("vat_percentage", "7.5").is_ok());
        assert!(validate_value("vat_percentage", "abc").is_err());
        assert!(validate_value("vat_percentage", "21").is_err());
        assert!(validate_value("quotation_prefix", "").is_err());
        assert!(validate_value("quotation_prefix", "QT").is_ok());
        assert!(validate_value("quotation_prefix", &"Q".repeat(45)).is_err());
        assert!(validate_value("company_tagline", "").is_ok());
    }
}
