//! Dashboard repository for summary counts and recent activity.

use quotedesk_core::quotation::QuotationStatus;
use sea_orm::DatabaseConnection;

use super::customer::{CustomerError, CustomerRepository};
use super::item::{ItemError, ItemRepository};
use super::quotation::{QuotationRepoError, QuotationRepository, QuotationSummary};

/// Number of quotations shown in the recent activity list.
pub const RECENT_QUOTATIONS: u64 = 5;

/// Error types for dashboard operations.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Quotation query failed.
    #[error(transparent)]
    Quotations(#[from] QuotationRepoError),

    /// Customer query failed.
    #[error(transparent)]
    Customers(#[from] CustomerError),

    /// Catalog query failed.
    #[error(transparent)]
    Items(#[from] ItemError),
}

/// Home screen figures.
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    /// All quotations.
    pub total_quotations: u64,
    /// Quotations still in draft.
    pub draft_quotations: u64,
    /// All customers.
    pub customers: u64,
    /// Catalog items marked active.
    pub active_items: u64,
    /// Most recently created quotations, newest first.
    pub recent: Vec<QuotationSummary>,
}

/// Dashboard repository.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Collects the dashboard summary.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the underlying queries fails.
    pub async fn summary(&self) -> Result<DashboardSummary, DashboardError> {
        let quotations = QuotationRepository::new(self.db.clone());
        let customers = CustomerRepository::new(self.db.clone());
        let items = ItemRepository::new(self.db.clone());

        let (total_quotations, draft_quotations, customers, active_items, recent) = tokio::try_join!(
            async { quotations.count().await.map_err(DashboardError::from) },
            async {
                quotations
                    .count_by_status(QuotationStatus::Draft)
                    .await
                    .map_err(DashboardError::from)
            },
            async { customers.count().await.map_err(DashboardError::from) },
            async { items.count_active().await.map_err(DashboardError::from) },
            async {
                quotations
                    .recent(RECENT_QUOTATIONS)
                    .await
                    .map_err(DashboardError::from)
            },
        )?;

        Ok(DashboardSummary {
            total_quotations,
            draft_quotations,
            customers,
            active_items,
            recent,
        })
    }
}
