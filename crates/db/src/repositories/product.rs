//! Product repository. Products are static reference data, seeded once.

use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};

use crate::entities::products;

/// Finds a product by its unique business name on any connection,
/// including an open transaction.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn find_by_name<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> Result<Option<products::Model>, DbErr> {
    products::Entity::find()
        .filter(products::Column::Name.eq(name))
        .one(conn)
        .await
}

/// Product repository.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a product by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<products::Model>, DbErr> {
        find_by_name(&self.db, name).await
    }
}
