//! Database seeder for QuoteDesk development and testing.
//!
//! Seeds the default settings, an administrator, sample customers and
//! sample catalog items, then prints a bearer token for the administrator.
//! Existing records are left untouched, so the seeder can be re-run.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use quotedesk_core::directory::{CatalogItemInput, CustomerInput, NewCatalogItem, NewCustomer};
use quotedesk_db::entities::sea_orm_active_enums::UserRole;
use quotedesk_db::repositories::ItemFilter;
use quotedesk_db::repositories::settings::{
    QUOTATION_PREFIX_KEY, QUOTATION_TERMS_KEY, VAT_PERCENTAGE_KEY,
};
use quotedesk_db::{
    CustomerRepository, ItemRepository, SettingsRepository, UserRepository, connect_with,
};
use quotedesk_shared::{AppConfig, JwtConfig, JwtService};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

const ADMIN_NAME: &str = "QuoteDesk Admin";
const ADMIN_EMAIL: &str = "admin@quotedesk.local";

const DEFAULT_TERMS: &str = "1. Prices are valid for 30 days from the date of quotation
2. Payment terms: 50% advance, 50% upon completion
3. Delivery: 4-6 weeks from order confirmation
4. Installation to be carried out during normal working hours
5. Any additional civil or structural work not included
6. Prices exclude site mobilization and demobilization
7. All materials are as per approved specifications";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Connecting to database...");
    let db = connect_with(&config.database)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding settings...");
    seed_settings(&db).await?;

    println!("Seeding admin user...");
    let admin = UserRepository::new(db.clone())
        .find_or_create(ADMIN_NAME, ADMIN_EMAIL, UserRole::Admin)
        .await?;

    println!("Seeding customers...");
    seed_customers(&db).await?;

    println!("Seeding catalog items...");
    seed_items(&db).await?;

    let jwt = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_minutes: i64::try_from(config.jwt.access_token_expiry_secs / 60)
            .unwrap_or(i64::MAX),
    });
    let token = jwt
        .generate_access_token(admin.id, "ADMIN")
        .context("Failed to sign development token")?;

    println!("Seeding complete!");
    println!("Admin user: {} <{}>", admin.name, admin.email);
    println!("Development token:\n{token}");

    Ok(())
}

/// Inserts the well-known settings that are missing.
async fn seed_settings(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = SettingsRepository::new(db.clone());
    let defaults = [
        (VAT_PERCENTAGE_KEY, "5", "Default VAT percentage"),
        (QUOTATION_PREFIX_KEY, "CRY", "Quotation number prefix"),
        (QUOTATION_TERMS_KEY, DEFAULT_TERMS, "Default terms and conditions"),
    ];

    for (key, value, description) in defaults {
        if repo.get_setting(key).await?.is_some() {
            println!("  {key} already set, skipping...");
            continue;
        }
        repo.upsert_with_description(key, value, Some(description))
            .await?;
    }

    Ok(())
}

/// Inserts the sample customers that are missing, matched by company name.
async fn seed_customers(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = CustomerRepository::new(db.clone());
    let existing = repo.list().await?;

    let samples = [
        CustomerInput {
            company_name: "Emirates Development LLC".to_string(),
            contact_person: Some("Ahmed Al Maktoum".to_string()),
            phone: Some("+971-4-123-4567".to_string()),
            email: Some("ahmed@emiratesdev.ae".to_string()),
            address: Some("Business Bay, Dubai, UAE".to_string()),
        },
        CustomerInput {
            company_name: "Dubai Properties Group".to_string(),
            contact_person: Some("Sara Johnson".to_string()),
            phone: Some("+971-4-234-5678".to_string()),
            email: Some("sara@dubaiproperties.ae".to_string()),
            address: Some("Downtown Dubai, UAE".to_string()),
        },
    ];

    for sample in samples {
        if existing.iter().any(|c| c.company_name == sample.company_name) {
            println!("  {} already exists, skipping...", sample.company_name);
            continue;
        }
        repo.create(&NewCustomer::new(sample)?).await?;
    }

    Ok(())
}

/// Inserts the sample catalog items that are missing, matched by name.
async fn seed_items(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = ItemRepository::new(db.clone());
    let existing = repo.list(&ItemFilter::default()).await?;

    let samples = [
        CatalogItemInput {
            category: "GLASS".to_string(),
            name: "12mm Clear Tempered Glass".to_string(),
            description: Some("Crystal clear tempered safety glass, 12mm thickness".to_string()),
            unit: "sqm".to_string(),
            default_rate: Decimal::from(280),
            is_active: Some(true),
        },
        CatalogItemInput {
            category: "ALUMINUM".to_string(),
            name: "Aluminum Profile System".to_string(),
            description: Some("Structural aluminum profiles for glass installation".to_string()),
            unit: "rm".to_string(),
            default_rate: Decimal::from(85),
            is_active: Some(true),
        },
    ];

    for sample in samples {
        if existing.iter().any(|i| i.name == sample.name) {
            println!("  {} already exists, skipping...", sample.name);
            continue;
        }
        repo.create(&NewCatalogItem::new(sample)?).await?;
    }

    Ok(())
}
