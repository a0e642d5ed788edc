//! Customer directory and item catalog.
//!
//! Validated inputs for the reference data quotations are built from.
//! Both create and full-replacement updates go through the same
//! constructors.

pub mod catalog;
pub mod customer;
pub mod error;

pub use catalog::{CatalogItemInput, ItemCategory, MAX_ITEM_NAME_LEN, MAX_UNIT_LEN, NewCatalogItem};
pub use customer::{CustomerInput, MAX_CUSTOMER_TEXT_LEN, MAX_PHONE_LEN, NewCustomer};
pub use error::DirectoryError;
