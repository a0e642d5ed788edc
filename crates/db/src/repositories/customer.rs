//! Customer repository for database operations.

use quotedesk_core::directory::NewCustomer;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{customers, quotations};

/// Error types for customer operations.
#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    /// Customer not found.
    #[error("Customer not found: {0}")]
    NotFound(Uuid),

    /// Customer is referenced by quotations and cannot be deleted.
    #[error("Customer is referenced by {quotations} quotation(s)")]
    InUse {
        /// Customer ID.
        id: Uuid,
        /// Number of referencing quotations.
        quotations: u64,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Customer repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: &NewCustomer) -> Result<customers::Model, CustomerError> {
        let now = chrono::Utc::now().into();

        let customer = customers::ActiveModel {
            id: Set(Uuid::now_v7()),
            company_name: Set(input.company_name.clone()),
            contact_person: Set(input.contact_person.clone()),
            phone: Set(input.phone.clone()),
            email: Set(input.email.clone()),
            address: Set(input.address.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(customer_id = %customer.id, company_name = %customer.company_name, "Customer created");
        Ok(customer)
    }

    /// Lists all customers ordered by company name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<customers::Model>, CustomerError> {
        Ok(customers::Entity::find()
            .order_by_asc(customers::Column::CompanyName)
            .all(&self.db)
            .await?)
    }

    /// Finds a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<customers::Model>, CustomerError> {
        Ok(customers::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Replaces a customer's details.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if the customer does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        input: &NewCustomer,
    ) -> Result<customers::Model, CustomerError> {
        let existing = customers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CustomerError::NotFound(id))?;

        let mut customer = existing.into_active_model();
        customer.company_name = Set(input.company_name.clone());
        customer.contact_person = Set(input.contact_person.clone());
        customer.phone = Set(input.phone.clone());
        customer.email = Set(input.email.clone());
        customer.address = Set(input.address.clone());
        customer.updated_at = Set(chrono::Utc::now().into());

        let customer = customer.update(&self.db).await?;
        info!(customer_id = %id, "Customer updated");
        Ok(customer)
    }

    /// Deletes a customer that no quotation references.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if the customer does not exist and
    /// `CustomerError::InUse` if quotations still reference it.
    pub async fn delete(&self, id: Uuid) -> Result<(), CustomerError> {
        let customer = customers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CustomerError::NotFound(id))?;

        let references = quotations::Entity::find()
            .filter(quotations::Column::CustomerId.eq(id))
            .count(&self.db)
            .await?;

        if references > 0 {
            return Err(CustomerError::InUse {
                id,
                quotations: references,
            });
        }

        customers::Entity::delete_by_id(id).exec(&self.db).await?;
        info!(customer_id = %id, company_name = %customer.company_name, "Customer deleted");
        Ok(())
    }

    /// Counts all customers.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count(&self) -> Result<u64, CustomerError> {
        Ok(customers::Entity::find().count(&self.db).await?)
    }
}
