//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration. The schema is also
//! reachable through `GET /api/init-db`, which runs the same migrator and
//! then applies the seed.

pub use sea_orm_migration::prelude::*;

mod m20250901_000001_initial;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250901_000001_initial::Migration)]
    }
}
