//! Item catalog entries.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::{DirectoryError, ensure_max_len};

/// Width of the item name column.
pub const MAX_ITEM_NAME_LEN: usize = 255;
/// Width of the unit column.
pub const MAX_UNIT_LEN: usize = 50;

/// Catalog item category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemCategory {
    /// Glass panels.
    Glass,
    /// Aluminum profiles.
    Aluminum,
    /// Fittings and accessories.
    Hardware,
    /// Installation work.
    Labor,
    /// Anything else.
    Misc,
}

impl ItemCategory {
    /// All categories.
    pub const ALL: [Self; 5] = [
        Self::Glass,
        Self::Aluminum,
        Self::Hardware,
        Self::Labor,
        Self::Misc,
    ];

    /// Returns the wire name of the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Glass => "GLASS",
            Self::Aluminum => "ALUMINUM",
            Self::Hardware => "HARDWARE",
            Self::Labor => "LABOR",
            Self::Misc => "MISC",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemCategory {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DirectoryError::InvalidCategory(s.to_string()))
    }
}

/// Request body for creating or replacing a catalog item.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogItemInput {
    /// Category name.
    pub category: String,
    /// Item name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Unit of measure, e.g. `sqm`.
    pub unit: String,
    /// Default price per unit.
    pub default_rate: Decimal,
    /// Whether the item is offered; defaults to true.
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// A validated catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCatalogItem {
    /// Category.
    pub category: ItemCategory,
    /// Item name.
    pub name: String,
    /// Description, `None` when blank.
    pub description: Option<String>,
    /// Unit of measure.
    pub unit: String,
    /// Default price per unit.
    pub default_rate: Decimal,
    /// Whether the item is offered.
    pub is_active: bool,
}

fn required(field: &'static str, value: String) -> Result<String, DirectoryError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(DirectoryError::Required(field));
    }
    Ok(value)
}

impl NewCatalogItem {
    /// Validates a catalog item request.
    ///
    /// # Errors
    ///
    /// Returns a `DirectoryError` for an unknown category, a blank or
    /// over-long name or unit, or a negative rate.
    pub fn new(input: CatalogItemInput) -> Result<Self, DirectoryError> {
        let category = input.category.parse()?;
        let name = required("Name", input.name)?;
        let unit = required("Unit", input.unit)?;
        ensure_max_len("Name", Some(&name), MAX_ITEM_NAME_LEN)?;
        ensure_max_len("Unit", Some(&unit), MAX_UNIT_LEN)?;

        if input.default_rate < Decimal::ZERO {
            return Err(DirectoryError::NegativeRate(input.default_rate));
        }

        Ok(Self {
            category,
            name,
            description: input
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            unit,
            default_rate: input.default_rate,
            is_active: input.is_active.unwrap_or(true),
        })
    }
}
