//! `SeaORM` entity definitions.

pub mod customers;
pub mod item_catalog;
pub mod quotation_items;
pub mod quotations;
pub mod sea_orm_active_enums;
pub mod settings;
pub mod users;

pub mod prelude {
    //! Re-exports of every entity type.

    pub use super::customers::Entity as Customers;
    pub use super::item_catalog::Entity as ItemCatalog;
    pub use super::quotation_items::Entity as QuotationItems;
    pub use super::quotations::Entity as Quotations;
    pub use super::settings::Entity as Settings;
    pub use super::users::Entity as Users;
}
