//! `SeaORM` active enums mapped to Postgres enum types.

use quotedesk_core::directory::ItemCategory as CoreItemCategory;
use quotedesk_core::quotation::QuotationStatus as CoreQuotationStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Staff role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
pub enum UserRole {
    /// Full access.
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    /// Prepares quotations.
    #[sea_orm(string_value = "ESTIMATOR")]
    Estimator,
}

/// Quotation status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "quotation_status")]
pub enum QuotationStatus {
    /// Being prepared.
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    /// Sent to the customer.
    #[sea_orm(string_value = "SENT")]
    Sent,
    /// Reissued after changes.
    #[sea_orm(string_value = "REVISED")]
    Revised,
    /// Accepted.
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    /// Declined.
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

/// Catalog item category column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "item_category")]
pub enum ItemCategory {
    /// Glass panels.
    #[sea_orm(string_value = "GLASS")]
    Glass,
    /// Aluminum profiles.
    #[sea_orm(string_value = "ALUMINUM")]
    Aluminum,
    /// Fittings and accessories.
    #[sea_orm(string_value = "HARDWARE")]
    Hardware,
    /// Installation work.
    #[sea_orm(string_value = "LABOR")]
    Labor,
    /// Anything else.
    #[sea_orm(string_value = "MISC")]
    Misc,
}

impl From<CoreQuotationStatus> for QuotationStatus {
    fn from(status: CoreQuotationStatus) -> Self {
        match status {
            CoreQuotationStatus::Draft => Self::Draft,
            CoreQuotationStatus::Sent => Self::Sent,
            CoreQuotationStatus::Revised => Self::Revised,
            CoreQuotationStatus::Approved => Self::Approved,
            CoreQuotationStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<QuotationStatus> for CoreQuotationStatus {
    fn from(status: QuotationStatus) -> Self {
        match status {
            QuotationStatus::Draft => Self::Draft,
            QuotationStatus::Sent => Self::Sent,
            QuotationStatus::Revised => Self::Revised,
            QuotationStatus::Approved => Self::Approved,
            QuotationStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<CoreItemCategory> for ItemCategory {
    fn from(category: CoreItemCategory) -> Self {
        match category {
            CoreItemCategory::Glass => Self::Glass,
            CoreItemCategory::Aluminum => Self::Aluminum,
            CoreItemCategory::Hardware => Self::Hardware,
            CoreItemCategory::Labor => Self::Labor,
            CoreItemCategory::Misc => Self::Misc,
        }
    }
}

impl From<ItemCategory> for CoreItemCategory {
    fn from(category: ItemCategory) -> Self {
        match category {
            ItemCategory::Glass => Self::Glass,
            ItemCategory::Aluminum => Self::Aluminum,
            ItemCategory::Hardware => Self::Hardware,
            ItemCategory::Labor => Self::Labor,
            ItemCategory::Misc => Self::Misc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_core() {
        for status in CoreQuotationStatus::ALL {
            let db: QuotationStatus = status.into();
            assert_eq!(CoreQuotationStatus::from(db), status);
            assert_eq!(db.to_value(), status.as_str());
        }
    }

    #[test]
    fn test_category_round_trips_through_core() {
        for category in CoreItemCategory::ALL {
            let db: ItemCategory = category.into();
            assert_eq!(CoreItemCategory::from(db), category);
            assert_eq!(db.to_value(), category.as_str());
        }
    }
}
