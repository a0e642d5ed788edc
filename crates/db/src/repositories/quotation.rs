//! Quotation repository.
//!
//! Number assignment and row insertion happen in one transaction. A
//! transaction-scoped advisory lock serializes creators, and the unique
//! constraint on `quotation_number` backs it up: a collision rolls the
//! transaction back and the whole attempt is retried.

use quotedesk_core::numbering::next_quotation_number;
use quotedesk_core::quotation::{
    LineItem, NewQuotation, QuotationError, QuotationStatus as CoreQuotationStatus,
    QuotationUpdate, QuotationUpdateInput, VatPercentage,
};
use quotedesk_shared::types::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
    TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::entities::{
    customers, quotation_items, quotations, sea_orm_active_enums::QuotationStatus, users,
};

/// How many times creation is attempted when the quotation number collides.
pub const MAX_NUMBER_ATTEMPTS: u32 = 5;

/// Advisory lock key guarding quotation number assignment.
const NUMBERING_LOCK_KEY: i64 = 0x5155_4F54_4E55_4D;

/// Error types for quotation operations.
#[derive(Debug, thiserror::Error)]
pub enum QuotationRepoError {
    /// Quotation not found.
    #[error("Quotation not found: {0}")]
    NotFound(Uuid),

    /// Referenced customer does not exist.
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    /// Creating user is not provisioned.
    #[error("User not found: {0}")]
    CreatorNotFound(Uuid),

    /// Input or stored state failed domain validation.
    #[error(transparent)]
    Validation(#[from] QuotationError),

    /// Every attempt to claim a quotation number collided.
    #[error("Could not assign a unique quotation number after {0} attempts")]
    NumberConflict(u32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A quotation with its ordered items and related records.
#[derive(Debug, Clone)]
pub struct QuotationDetails {
    /// Quotation header.
    pub quotation: quotations::Model,
    /// Line items ordered by `sort_order`.
    pub items: Vec<quotation_items::Model>,
    /// Customer, if it still exists.
    pub customer: Option<customers::Model>,
    /// Creating user, if it still exists.
    pub created_by: Option<users::Model>,
}

/// A quotation header with its customer, for listings.
#[derive(Debug, Clone)]
pub struct QuotationSummary {
    /// Quotation header.
    pub quotation: quotations::Model,
    /// Customer.
    pub customer: Option<customers::Model>,
}

/// Filter options for listing quotations.
#[derive(Debug, Clone, Default)]
pub struct QuotationFilter {
    /// Only quotations in this status.
    pub status: Option<CoreQuotationStatus>,
    /// Only quotations for this customer.
    pub customer_id: Option<Uuid>,
}

/// Quotation repository.
#[derive(Debug, Clone)]
pub struct QuotationRepository {
    db: DatabaseConnection,
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn item_active_model(quotation_id: Uuid, item: &LineItem) -> quotation_items::ActiveModel {
    use quotedesk_core::pricing::HasSubtotal;

    quotation_items::ActiveModel {
        id: Set(Uuid::now_v7()),
        quotation_id: Set(quotation_id),
        scope_of_work: Set(item.scope_of_work().to_string()),
        description: Set(item.description().map(str::to_string)),
        quantity: Set(item.quantity()),
        rate: Set(item.rate()),
        vat_rate: Set(item.vat_rate()),
        sub_total: Set(item.sub_total()),
        sort_order: Set(item.sort_order()),
    }
}

/// Reads the most recently issued quotation number.
async fn last_issued_number<C: ConnectionTrait>(conn: &C) -> Result<Option<String>, DbErr> {
    Ok(quotations::Entity::find()
        .order_by_desc(quotations::Column::CreatedAt)
        .order_by_desc(quotations::Column::QuotationNumber)
        .one(conn)
        .await?
        .map(|q| q.quotation_number))
}

async fn load_items<C: ConnectionTrait>(
    conn: &C,
    quotation_id: Uuid,
) -> Result<Vec<quotation_items::Model>, DbErr> {
    quotation_items::Entity::find()
        .filter(quotation_items::Column::QuotationId.eq(quotation_id))
        .order_by_asc(quotation_items::Column::SortOrder)
        .order_by_asc(quotation_items::Column::Id)
        .all(conn)
        .await
}

async fn replace_items<C: ConnectionTrait>(
    conn: &C,
    quotation_id: Uuid,
    items: &[LineItem],
) -> Result<Vec<quotation_items::Model>, DbErr> {
    quotation_items::Entity::delete_many()
        .filter(quotation_items::Column::QuotationId.eq(quotation_id))
        .exec(conn)
        .await?;

    if !items.is_empty() {
        quotation_items::Entity::insert_many(
            items.iter().map(|item| item_active_model(quotation_id, item)),
        )
        .exec(conn)
        .await?;
    }

    load_items(conn, quotation_id).await
}

impl QuotationRepository {
    /// Creates a new quotation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the most recently issued quotation number, ordering by
    /// creation time with the number itself as tie-breaker.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn last_issued_quotation_number(&self) -> Result<Option<String>, QuotationRepoError> {
        Ok(last_issued_number(&self.db).await?)
    }

    /// Numbers and stores a validated quotation with its items.
    ///
    /// # Errors
    ///
    /// Returns `CustomerNotFound` or `CreatorNotFound` for dangling
    /// references, `Validation` when the last stored number is malformed,
    /// `NumberConflict` when every attempt collided, or a database error.
    pub async fn create_quotation(
        &self,
        input: &NewQuotation,
        created_by: Uuid,
        prefix: &str,
        year: i32,
    ) -> Result<QuotationDetails, QuotationRepoError> {
        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            match self.try_create(input, created_by, prefix, year).await {
                Err(QuotationRepoError::Database(e)) if is_unique_violation(&e) => {
                    warn!(attempt, error = %e, "Quotation number collision, retrying");
                }
                result => return result,
            }
        }

        Err(QuotationRepoError::NumberConflict(MAX_NUMBER_ATTEMPTS))
    }

    async fn try_create(
        &self,
        input: &NewQuotation,
        created_by: Uuid,
        prefix: &str,
        year: i32,
    ) -> Result<QuotationDetails, QuotationRepoError> {
        let txn = self.db.begin().await?;

        txn.execute_unprepared(&format!("SELECT pg_advisory_xact_lock({NUMBERING_LOCK_KEY})"))
            .await?;

        let customer_id = input.customer_id.into_inner();
        let customer = customers::Entity::find_by_id(customer_id)
            .one(&txn)
            .await?
            .ok_or(QuotationRepoError::CustomerNotFound(customer_id))?;
        let creator = users::Entity::find_by_id(created_by)
            .one(&txn)
            .await?
            .ok_or(QuotationRepoError::CreatorNotFound(created_by))?;

        let last = last_issued_number(&txn).await?;
        let quotation_number =
            next_quotation_number(last.as_deref(), prefix, year).map_err(QuotationError::from)?;

        let now = chrono::Utc::now().into();
        let quotation_id = Uuid::now_v7();

        let quotation = quotations::ActiveModel {
            id: Set(quotation_id),
            quotation_number: Set(quotation_number),
            customer_id: Set(customer_id),
            project_name: Set(input.project_name.clone()),
            site_location: Set(input.site_location.clone()),
            status: Set(input.status.into()),
            subtotal: Set(input.totals.subtotal),
            vat_percentage: Set(input.vat_percentage.value()),
            vat_amount: Set(input.totals.vat_amount),
            total: Set(input.totals.total),
            notes: Set(input.notes.clone()),
            terms: Set(input.terms.clone()),
            created_by_id: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let items = replace_items(&txn, quotation_id, &input.items).await?;

        txn.commit().await?;

        info!(
            quotation_id = %quotation.id,
            quotation_number = %quotation.quotation_number,
            total = %quotation.total,
            "Quotation created"
        );

        Ok(QuotationDetails {
            quotation,
            items,
            customer: Some(customer),
            created_by: Some(creator),
        })
    }

    /// Replaces all items of a quotation and re-totals it with its
    /// current VAT percentage.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the quotation does not exist, `Validation` for
    /// an empty item list, or a database error.
    pub async fn replace_quotation_items(
        &self,
        id: Uuid,
        items: &[LineItem],
    ) -> Result<QuotationDetails, QuotationRepoError> {
        if items.is_empty() {
            return Err(QuotationError::NoLineItems.into());
        }

        let txn = self.db.begin().await?;
        let existing = quotations::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(QuotationRepoError::NotFound(id))?;

        let totals =
            quotedesk_core::pricing::compute_document_totals(items, existing.vat_percentage)
                .map_err(QuotationError::from)?;

        let mut quotation = existing.into_active_model();
        quotation.subtotal = Set(totals.subtotal);
        quotation.vat_amount = Set(totals.vat_amount);
        quotation.total = Set(totals.total);
        quotation.updated_at = Set(chrono::Utc::now().into());
        let quotation = quotation.update(&txn).await?;

        let items = replace_items(&txn, id, items).await?;
        txn.commit().await?;

        info!(quotation_id = %id, items = items.len(), "Quotation items replaced");
        self.attach_relations(quotation, items).await
    }

    /// Applies a partial update.
    ///
    /// The request is validated against the row as locked inside the
    /// transaction, so replacement items and a percentage-only change are
    /// always priced against the quotation's current VAT percentage. Stored
    /// per-line VAT amounts of kept items are not touched.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `CustomerNotFound`, `Validation`, or a database
    /// error.
    pub async fn update_quotation(
        &self,
        id: Uuid,
        input: QuotationUpdateInput,
    ) -> Result<QuotationDetails, QuotationRepoError> {
        let txn = self.db.begin().await?;

        let existing = quotations::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(QuotationRepoError::NotFound(id))?;

        let current_vat = VatPercentage::new(existing.vat_percentage)?;
        let update = QuotationUpdate::new(input, current_vat)?;

        if update.is_empty() {
            txn.commit().await?;
            let items = load_items(&self.db, id).await?;
            return self.attach_relations(existing, items).await;
        }

        if let Some(customer_id) = update.customer_id {
            let customer_id = customer_id.into_inner();
            if customers::Entity::find_by_id(customer_id).one(&txn).await?.is_none() {
                return Err(QuotationRepoError::CustomerNotFound(customer_id));
            }
        }

        let existing_items = load_items(&txn, id).await?;
        let totals = update.resolve_totals(&existing_items, current_vat)?;

        let mut quotation = existing.into_active_model();
        if let Some(customer_id) = update.customer_id {
            quotation.customer_id = Set(customer_id.into_inner());
        }
        if let Some(project_name) = &update.project_name {
            quotation.project_name = Set(project_name.clone());
        }
        if let Some(site_location) = &update.site_location {
            quotation.site_location = Set(site_location.clone());
        }
        if let Some(status) = update.status {
            quotation.status = Set(status.into());
        }
        if let Some(vat) = update.vat_percentage {
            quotation.vat_percentage = Set(vat.value());
        }
        if let Some(notes) = &update.notes {
            quotation.notes = Set(notes.clone());
        }
        if let Some(terms) = &update.terms {
            quotation.terms = Set(terms.clone());
        }
        if let Some(totals) = totals {
            quotation.subtotal = Set(totals.subtotal);
            quotation.vat_amount = Set(totals.vat_amount);
            quotation.total = Set(totals.total);
        }
        quotation.updated_at = Set(chrono::Utc::now().into());

        let quotation = quotation.update(&txn).await?;

        let items = match &update.items {
            Some(items) => replace_items(&txn, id, items).await?,
            None => existing_items,
        };

        txn.commit().await?;

        info!(
            quotation_id = %id,
            status = ?quotation.status,
            total = %quotation.total,
            "Quotation updated"
        );
        self.attach_relations(quotation, items).await
    }

    async fn attach_relations(
        &self,
        quotation: quotations::Model,
        items: Vec<quotation_items::Model>,
    ) -> Result<QuotationDetails, QuotationRepoError> {
        let customer = customers::Entity::find_by_id(quotation.customer_id)
            .one(&self.db)
            .await?;
        let created_by = users::Entity::find_by_id(quotation.created_by_id)
            .one(&self.db)
            .await?;

        Ok(QuotationDetails {
            quotation,
            items,
            customer,
            created_by,
        })
    }

    /// Finds a quotation with its items, customer and creator.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<QuotationDetails>, QuotationRepoError> {
        let Some(quotation) = quotations::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let items = load_items(&self.db, id).await?;
        self.attach_relations(quotation, items).await.map(Some)
    }

    /// Lists quotations newest first.
    ///
    /// Returns the requested page and the total number of matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &QuotationFilter,
        page: &PageRequest,
    ) -> Result<(Vec<QuotationSummary>, u64), QuotationRepoError> {
        let page = page.normalized();
        let mut query = quotations::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(quotations::Column::Status.eq(QuotationStatus::from(status)));
        }
        if let Some(customer_id) = filter.customer_id {
            query = query.filter(quotations::Column::CustomerId.eq(customer_id));
        }

        let paginator = query
            .find_also_related(customers::Entity)
            .order_by_desc(quotations::Column::CreatedAt)
            .order_by_desc(quotations::Column::QuotationNumber)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(u64::from(page.page - 1)).await?;

        let summaries = rows
            .into_iter()
            .map(|(quotation, customer)| QuotationSummary { quotation, customer })
            .collect();

        Ok((summaries, total))
    }

    /// Returns the `limit` most recently created quotations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn recent(&self, limit: u64) -> Result<Vec<QuotationSummary>, QuotationRepoError> {
        let rows = quotations::Entity::find()
            .find_also_related(customers::Entity)
            .order_by_desc(quotations::Column::CreatedAt)
            .order_by_desc(quotations::Column::QuotationNumber)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(quotation, customer)| QuotationSummary { quotation, customer })
            .collect())
    }

    /// Deletes a quotation and, by cascade, its items.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the quotation does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), QuotationRepoError> {
        let result = quotations::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(QuotationRepoError::NotFound(id));
        }
        info!(quotation_id = %id, "Quotation deleted");
        Ok(())
    }

    /// Counts all quotations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count(&self) -> Result<u64, QuotationRepoError> {
        Ok(quotations::Entity::find().count(&self.db).await?)
    }

    /// Counts quotations in one status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_by_status(
        &self,
        status: CoreQuotationStatus,
    ) -> Result<u64, QuotationRepoError> {
        Ok(quotations::Entity::find()
            .filter(quotations::Column::Status.eq(QuotationStatus::from(status)))
            .count(&self.db)
            .await?)
    }
}
