//! Period repository.
//!
//! Periods are created lazily on first financial-data write for a date;
//! an existing period has its `period_type` updated on conflict.

use chrono::NaiveDate;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set,
};

use finboard_core::fiscal::fiscal_year_label;

use crate::entities::periods;

/// Inserts or updates the period for a date on any connection, including an
/// open transaction. The fiscal-year label is derived from the date when not
/// pre-supplied.
///
/// # Errors
///
/// Returns an error if the upsert fails.
pub async fn upsert<C: ConnectionTrait>(
    conn: &C,
    period_date: NaiveDate,
    period_type: &str,
    fiscal_year: Option<String>,
) -> Result<periods::Model, DbErr> {
    let fiscal_year = fiscal_year.unwrap_or_else(|| fiscal_year_label(period_date));

    let period = periods::ActiveModel {
        period_date: Set(period_date),
        period_type: Set(period_type.to_string()),
        fiscal_year: Set(fiscal_year),
        ..Default::default()
    };

    periods::Entity::insert(period)
        .on_conflict(
            OnConflict::column(periods::Column::PeriodDate)
                .update_column(periods::Column::PeriodType)
                .to_owned(),
        )
        .exec_with_returning(conn)
        .await
}

/// Period repository.
#[derive(Debug, Clone)]
pub struct PeriodRepository {
    db: DatabaseConnection,
}

impl PeriodRepository {
    /// Creates a new period repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts or updates the period for a date, returning its identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails.
    pub async fn upsert(
        &self,
        period_date: NaiveDate,
        period_type: &str,
        fiscal_year: Option<String>,
    ) -> Result<periods::Model, DbErr> {
        upsert(&self.db, period_date, period_type, fiscal_year).await
    }

    /// Returns the most recent period by date, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn latest(&self) -> Result<Option<periods::Model>, DbErr> {
        periods::Entity::find()
            .order_by_desc(periods::Column::PeriodDate)
            .one(&self.db)
            .await
    }
}
