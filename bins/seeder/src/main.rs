//! Database seeder for Finboard development and testing.
//!
//! Applies the idempotent reference seed: the four products, the three
//! monthly periods of FY 2025-26, the baseline financial and KPI facts,
//! and the two default users. Safe to re-run; natural-key conflicts are
//! skipped and fact tables are only filled when empty.
//!
//! Usage: cargo run --bin seeder

use sea_orm_migration::MigratorTrait;

use finboard_db::migration::Migrator;
use finboard_db::seed;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = finboard_db::connect(&database_url, 5)
        .await
        .expect("Failed to connect to database");

    println!("Applying pending migrations...");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    println!("Applying seed data...");
    seed::apply(&db).await.expect("Failed to apply seed data");

    println!("Seeding complete!");
}
