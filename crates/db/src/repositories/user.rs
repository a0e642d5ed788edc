//! User repository for database operations.
//!
//! Users are provisioned out of band; the API only reads them to attribute
//! quotations to their creator.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::UserRole, users};

/// User repository.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Returns the user with this email, creating it if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query or insert fails.
    pub async fn find_or_create(
        &self,
        name: &str,
        email: &str,
        role: UserRole,
    ) -> Result<users::Model, DbErr> {
        if let Some(user) = self.find_by_email(email).await? {
            return Ok(user);
        }

        let user = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            role: Set(role),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        info!(user_id = %user.id, email = %user.email, "User provisioned");
        Ok(user)
    }
}
