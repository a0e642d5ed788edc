//! Shared helpers for database integration tests.
//!
//! Tests are skipped when `DATABASE_URL` is not set.

#![allow(dead_code)]

use std::sync::OnceLock;

use quotedesk_core::directory::{CustomerInput, NewCustomer};
use quotedesk_db::entities::{customers, sea_orm_active_enums::UserRole, users};
use quotedesk_db::migration::Migrator;
use quotedesk_db::{CustomerRepository, UserRepository};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

static MIGRATED: OnceLock<tokio::sync::Mutex<bool>> = OnceLock::new();

/// Connects to the test database and applies migrations once per process.
pub async fn test_db() -> Option<DatabaseConnection> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping database test");
        return None;
    };

    let db = Database::connect(&url)
        .await
        .expect("Failed to connect to database");

    let mut migrated = MIGRATED
        .get_or_init(|| tokio::sync::Mutex::new(false))
        .lock()
        .await;
    if !*migrated {
        Migrator::up(&db, None).await.expect("Failed to run migrations");
        *migrated = true;
    }

    Some(db)
}

/// Creates a customer with a unique company name.
pub async fn create_customer(db: &DatabaseConnection) -> customers::Model {
    let input = NewCustomer::new(CustomerInput {
        company_name: format!("Test Customer {}", Uuid::new_v4()),
        contact_person: Some("Ahmed Al Mansouri".to_string()),
        email: Some("ahmed@example.ae".to_string()),
        ..CustomerInput::default()
    })
    .expect("valid customer");

    CustomerRepository::new(db.clone())
        .create(&input)
        .await
        .expect("Failed to create customer")
}

/// Creates an estimator with a unique email.
pub async fn create_user(db: &DatabaseConnection) -> users::Model {
    UserRepository::new(db.clone())
        .find_or_create(
            "Test Estimator",
            &format!("estimator-{}@example.com", Uuid::new_v4()),
            UserRole::Estimator,
        )
        .await
        .expect("Failed to create user")
}
