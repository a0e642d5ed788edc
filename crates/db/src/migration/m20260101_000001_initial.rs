//! Initial database migration.
//!
//! Creates the enum types, tables and indexes for customers, the item
//! catalog, quotations and their line items, settings and users.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: REFERENCE DATA
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(CUSTOMERS_SQL).await?;
        db.execute_unprepared(ITEM_CATALOG_SQL).await?;
        db.execute_unprepared(SETTINGS_SQL).await?;

        // ============================================================
        // PART 3: QUOTATIONS
        // ============================================================
        db.execute_unprepared(QUOTATIONS_SQL).await?;
        db.execute_unprepared(QUOTATION_ITEMS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE user_role AS ENUM ('ADMIN', 'ESTIMATOR');

CREATE TYPE quotation_status AS ENUM (
    'DRAFT',
    'SENT',
    'REVISED',
    'APPROVED',
    'REJECTED'
);

CREATE TYPE item_category AS ENUM (
    'GLASS',
    'ALUMINUM',
    'HARDWARE',
    'LABOR',
    'MISC'
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    role user_role NOT NULL DEFAULT 'ESTIMATOR',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_name VARCHAR(255) NOT NULL CHECK (length(trim(company_name)) > 0),
    contact_person VARCHAR(255),
    phone VARCHAR(50),
    email VARCHAR(255),
    address TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_customers_company_name ON customers(company_name);
";

const ITEM_CATALOG_SQL: &str = r"
CREATE TABLE item_catalog (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    category item_category NOT NULL,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    unit VARCHAR(50) NOT NULL,
    default_rate NUMERIC NOT NULL CHECK (default_rate >= 0),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_item_catalog_category ON item_catalog(category) WHERE is_active = true;
";

const SETTINGS_SQL: &str = r"
CREATE TABLE settings (
    key VARCHAR(100) PRIMARY KEY,
    value TEXT NOT NULL,
    description TEXT,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const QUOTATIONS_SQL: &str = r"
CREATE TABLE quotations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    quotation_number VARCHAR(50) NOT NULL,
    customer_id UUID NOT NULL REFERENCES customers(id) ON DELETE RESTRICT,
    project_name VARCHAR(255) NOT NULL,
    site_location VARCHAR(255),
    status quotation_status NOT NULL DEFAULT 'DRAFT',
    subtotal NUMERIC NOT NULL DEFAULT 0 CHECK (subtotal >= 0),
    vat_percentage NUMERIC NOT NULL DEFAULT 5 CHECK (vat_percentage >= 0 AND vat_percentage <= 20),
    vat_amount NUMERIC NOT NULL DEFAULT 0 CHECK (vat_amount >= 0),
    total NUMERIC NOT NULL DEFAULT 0 CHECK (total >= 0),
    notes TEXT,
    terms TEXT,
    created_by_id UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_quotations_number UNIQUE (quotation_number)
);

CREATE INDEX idx_quotations_created_at ON quotations(created_at DESC);
CREATE INDEX idx_quotations_status ON quotations(status);
CREATE INDEX idx_quotations_customer ON quotations(customer_id);
";

const QUOTATION_ITEMS_SQL: &str = r"
CREATE TABLE quotation_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    quotation_id UUID NOT NULL REFERENCES quotations(id) ON DELETE CASCADE,
    scope_of_work TEXT NOT NULL CHECK (length(trim(scope_of_work)) > 0),
    description TEXT,
    quantity NUMERIC NOT NULL CHECK (quantity >= 0),
    rate NUMERIC NOT NULL CHECK (rate >= 0),
    vat_rate NUMERIC NOT NULL DEFAULT 0 CHECK (vat_rate >= 0),
    sub_total NUMERIC NOT NULL CHECK (sub_total >= 0),
    sort_order INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX idx_quotation_items_order ON quotation_items(quotation_id, sort_order);
";

const DROP_ALL_SQL: &str = r"
-- Order matters due to foreign key constraints
DROP TABLE IF EXISTS quotation_items CASCADE;
DROP TABLE IF EXISTS quotations CASCADE;
DROP TABLE IF EXISTS settings CASCADE;
DROP TABLE IF EXISTS item_catalog CASCADE;
DROP TABLE IF EXISTS customers CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP TYPE IF EXISTS item_category;
DROP TYPE IF EXISTS quotation_status;
DROP TYPE IF EXISTS user_role;
";
