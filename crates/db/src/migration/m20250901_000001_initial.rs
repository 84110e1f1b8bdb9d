//! Initial database migration.
//!
//! Creates the five core tables. All statements are idempotent
//! (`IF NOT EXISTS`) so the migration can back the `GET /api/init-db`
//! bootstrap endpoint as well as the CLI bootstrap binary.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const PRODUCTS_SQL: &str = "
CREATE TABLE IF NOT EXISTS products (
    id SERIAL PRIMARY KEY,
    name VARCHAR(100) NOT NULL UNIQUE,
    category VARCHAR(50),
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

const PERIODS_SQL: &str = "
CREATE TABLE IF NOT EXISTS periods (
    id SERIAL PRIMARY KEY,
    period_date DATE NOT NULL UNIQUE,
    period_type VARCHAR(20) NOT NULL,
    fiscal_year VARCHAR(10) NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

const FINANCIAL_DATA_SQL: &str = "
CREATE TABLE IF NOT EXISTS financial_data (
    id SERIAL PRIMARY KEY,
    period_id INTEGER NOT NULL REFERENCES periods(id),
    product_id INTEGER NOT NULL REFERENCES products(id),
    sales_volume DECIMAL(10,2),
    production_volume DECIMAL(10,2),
    turnover_eur DECIMAL(15,2),
    rmpm_cost DECIMAL(15,2),
    operating_cost DECIMAL(15,2),
    net_profit DECIMAL(15,2),
    net_margin DECIMAL(5,4),
    contributive_margin DECIMAL(10,2),
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

const KPI_DATA_SQL: &str = "
CREATE TABLE IF NOT EXISTS kpi_data (
    id SERIAL PRIMARY KEY,
    period_id INTEGER NOT NULL REFERENCES periods(id),
    kpi_name VARCHAR(100) NOT NULL,
    target_value DECIMAL(15,2),
    actual_value DECIMAL(15,2),
    unit VARCHAR(50),
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

const USERS_SQL: &str = "
CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    email VARCHAR(255) UNIQUE NOT NULL,
    password VARCHAR(255) NOT NULL,
    name VARCHAR(255) NOT NULL,
    role VARCHAR(50) NOT NULL DEFAULT 'viewer',
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    last_login TIMESTAMP
)";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(PRODUCTS_SQL).await?;
        db.execute_unprepared(PERIODS_SQL).await?;
        db.execute_unprepared(FINANCIAL_DATA_SQL).await?;
        db.execute_unprepared(KPI_DATA_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared("DROP TABLE IF EXISTS financial_data")
            .await?;
        db.execute_unprepared("DROP TABLE IF EXISTS kpi_data").await?;
        db.execute_unprepared("DROP TABLE IF EXISTS periods").await?;
        db.execute_unprepared("DROP TABLE IF EXISTS products").await?;
        db.execute_unprepared("DROP TABLE IF EXISTS users").await?;

        Ok(())
    }
}
