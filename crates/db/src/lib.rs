//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the five tables
//! - Repository abstractions for data access
//! - Idempotent schema bootstrap and seed data

pub mod entities;
pub mod migration;
pub mod repositories;
pub mod seed;

pub use repositories::{
    FinancialRepository, KpiRepository, PeriodRepository, ProductRepository, UserRepository,
};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options.max_connections(max_connections);
    Database::connect(options).await
}
