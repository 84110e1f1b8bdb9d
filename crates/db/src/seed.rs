//! Idempotent seed data.
//!
//! Reference rows (products, periods, users) conflict on their natural keys
//! (name, period_date, email) and are skipped when already present.
//! Fact rows (financial_data, kpi_data) have no natural key, so they are
//! seeded only when their table is still empty; re-running the bootstrap
//! never duplicates them.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait};
use tracing::info;

use crate::entities::{financial_data, kpi_data};

const SEED_PRODUCTS_SQL: &str = "
INSERT INTO products (name, category) VALUES
    ('Plumpy*Nut', 'RUTF'),
    ('Plumpy*Sup', 'RUSF'),
    ('Maleda PB', 'Peanut Butter'),
    ('SQLNS 20g', 'Supplement')
ON CONFLICT (name) DO NOTHING";

const SEED_PERIODS_SQL: &str = "
INSERT INTO periods (period_date, period_type, fiscal_year) VALUES
    ('2025-09-30', 'Monthly', '2025-26'),
    ('2025-08-31', 'Monthly', '2025-26'),
    ('2025-07-31', 'Monthly', '2025-26')
ON CONFLICT (period_date) DO NOTHING";

const SEED_FINANCIAL_DATA_SQL: &str = "
INSERT INTO financial_data
    (period_id, product_id, sales_volume, production_volume, turnover_eur, net_profit, net_margin)
SELECT p.id, prod.id, v.sales, v.production, v.turnover, v.profit, v.margin
FROM (VALUES
    ('2025-09-30'::date, 'Plumpy*Nut', 1223::decimal, 913::decimal, 3746481::decimal, 1135021::decimal, 0.23::decimal),
    ('2025-08-31'::date, 'Plumpy*Nut', 607, 606, 1850000, 425000, 0.23)
) AS v(period_date, product_name, sales, production, turnover, profit, margin)
JOIN periods p ON p.period_date = v.period_date
JOIN products prod ON prod.name = v.product_name";

const SEED_KPI_DATA_SQL: &str = "
INSERT INTO kpi_data (period_id, kpi_name, target_value, actual_value, unit)
SELECT p.id, v.kpi_name, v.target, v.actual, v.unit
FROM (VALUES
    ('Q3 Production', 2542::decimal, 1519::decimal, 'T'),
    ('Local Peanut %', 6, 0, '%'),
    ('Net Margin %', 17, 23, '%'),
    ('YTD Remittance', 328650, 328650, 'EUR')
) AS v(kpi_name, target, actual, unit)
JOIN periods p ON p.period_date = '2025-09-30'::date";

const SEED_USERS_SQL: &str = "
INSERT INTO users (email, password, name, role) VALUES
    ('admin@hilinafoods.com',
     '$2a$10$8K1p/a0dRL1SzdiKJ.2.duZUMTp7pW7.OZ5B.8b.OdOMo3/.e.YsK',
     'System Administrator',
     'admin'),
    ('finance@hilinafoods.com',
     '$2a$10$8K1p/a0dRL1SzdiKJ.2.duZUMTp7pW7.OZ5B.8b.OdOMo3/.e.YsK',
     'Finance Manager',
     'finance')
ON CONFLICT (email) DO NOTHING";

/// Applies the seed data. Safe to call repeatedly.
///
/// # Errors
///
/// Returns an error if any statement fails.
pub async fn apply(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.execute_unprepared(SEED_PRODUCTS_SQL).await?;
    db.execute_unprepared(SEED_PERIODS_SQL).await?;
    db.execute_unprepared(SEED_USERS_SQL).await?;

    // Fact tables have no natural key; only seed them on a fresh database.
    if financial_data::Entity::find().count(db).await? == 0 {
        db.execute_unprepared(SEED_FINANCIAL_DATA_SQL).await?;
    }
    if kpi_data::Entity::find().count(db).await? == 0 {
        db.execute_unprepared(SEED_KPI_DATA_SQL).await?;
    }

    info!("Seed data applied");
    Ok(())
}
