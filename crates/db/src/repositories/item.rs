//! Item catalog repository for database operations.

use quotedesk_core::directory::{ItemCategory, NewCatalogItem};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::item_catalog;

/// Error types for catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    /// Item not found.
    #[error("Item not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filter options for listing catalog items.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    /// Only items in this category.
    pub category: Option<ItemCategory>,
    /// Only active items.
    pub active_only: bool,
}

/// Item catalog repository.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    db: DatabaseConnection,
}

impl ItemRepository {
    /// Creates a new item repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a catalog item.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: &NewCatalogItem) -> Result<item_catalog::Model, ItemError> {
        let now = chrono::Utc::now().into();

        let item = item_catalog::ActiveModel {
            id: Set(Uuid::now_v7()),
            category: Set(input.category.into()),
            name: Set(input.name.clone()),
            description: Set(input.description.clone()),
            unit: Set(input.unit.clone()),
            default_rate: Set(input.default_rate),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(item_id = %item.id, name = %item.name, "Catalog item created");
        Ok(item)
    }

    /// Lists catalog items ordered by category then name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, filter: &ItemFilter) -> Result<Vec<item_catalog::Model>, ItemError> {
        let mut query = item_catalog::Entity::find();

        if let Some(category) = filter.category {
            let category: crate::entities::sea_orm_active_enums::ItemCategory = category.into();
            query = query.filter(item_catalog::Column::Category.eq(category));
        }
        if filter.active_only {
            query = query.filter(item_catalog::Column::IsActive.eq(true));
        }

        Ok(query
            .order_by_asc(item_catalog::Column::Category)
            .order_by_asc(item_catalog::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Finds a catalog item by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<item_catalog::Model>, ItemError> {
        Ok(item_catalog::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Replaces a catalog item's details.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::NotFound` if the item does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        input: &NewCatalogItem,
    ) -> Result<item_catalog::Model, ItemError> {
        let existing = item_catalog::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ItemError::NotFound(id))?;

        let mut item = existing.into_active_model();
        item.category = Set(input.category.into());
        item.name = Set(input.name.clone());
        item.description = Set(input.description.clone());
        item.unit = Set(input.unit.clone());
        item.default_rate = Set(input.default_rate);
        item.is_active = Set(input.is_active);
        item.updated_at = Set(chrono::Utc::now().into());

        let item = item.update(&self.db).await?;
        info!(item_id = %id, "Catalog item updated");
        Ok(item)
    }

    /// Deletes a catalog item.
    ///
    /// Quotation lines copy catalog values, so deleting an item never
    /// affects existing quotations.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::NotFound` if the item does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), ItemError> {
        let result = item_catalog::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(ItemError::NotFound(id));
        }
        info!(item_id = %id, "Catalog item deleted");
        Ok(())
    }

    /// Counts active catalog items.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_active(&self) -> Result<u64, ItemError> {
        Ok(item_catalog::Entity::find()
            .filter(item_catalog::Column::IsActive.eq(true))
            .count(&self.db)
            .await?)
    }
}
