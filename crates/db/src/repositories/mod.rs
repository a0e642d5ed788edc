//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod customer;
pub mod dashboard;
pub mod item;
pub mod quotation;
pub mod settings;
pub mod user;

pub use customer::{CustomerError, CustomerRepository};
pub use dashboard::{DashboardError, DashboardRepository, DashboardSummary, RECENT_QUOTATIONS};
pub use item::{ItemError, ItemFilter, ItemRepository};
pub use quotation::{
    MAX_NUMBER_ATTEMPTS, QuotationDetails, QuotationFilter, QuotationRepoError,
    QuotationRepository, QuotationSummary,
};
pub use settings::{SettingsError, SettingsRepository};
pub use user::UserRepository;
