//! User repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;

use crate::entities::users;

/// A user row without the password hash, safe to return from the API.
#[derive(Debug, Clone, FromQueryResult, Serialize)]
pub struct UserSummary {
    /// User ID.
    pub id: i32,
    /// User email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role string.
    pub role: String,
    /// Active flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: chrono::NaiveDateTime,
    /// Last login timestamp.
    pub last_login: Option<chrono::NaiveDateTime>,
}

/// User repository for CRUD operations.
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

    /// Finds an active user by email. Inactive accounts are treated as
    /// absent, exactly like the login query.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_active_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .filter(users::Column::IsActive.eq(true))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Creates a new user. The caller supplies an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
        role: &str,
    ) -> Result<users::Model, DbErr> {
        let user = users::ActiveModel {
            email: Set(email.to_string()),
            password: Set(password_hash.to_string()),
            name: Set(name.to_string()),
            role: Set(role.to_string()),
            is_active: Set(true),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        user.insert(&self.db).await
    }

    /// Stamps the user's last-login timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn touch_last_login(&self, id: i32) -> Result<(), DbErr> {
        let user = users::ActiveModel {
            id: Set(id),
            last_login: Set(Some(Utc::now().naive_utc())),
            ..Default::default()
        };
        user.update(&self.db).await?;
        Ok(())
    }

    /// Lists all users without their password hashes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<UserSummary>, DbErr> {
        users::Entity::find()
            .select_only()
            .columns([
                users::Column::Id,
                users::Column::Email,
                users::Column::Name,
                users::Column::Role,
                users::Column::IsActive,
                users::Column::CreatedAt,
                users::Column::LastLogin,
            ])
            .order_by_asc(users::Column::Id)
            .into_model::<UserSummary>()
            .all(&self.db)
            .await
    }
}
