//! Financial record repository.
//!
//! One record per (period, product) conceptually, but uniqueness is not
//! enforced; repeated inserts create additional rows (append-only history,
//! preserved deliberately pending product-owner clarification).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    TransactionTrait,
};
use serde::Serialize;

use crate::entities::{financial_data, periods, products};
use crate::repositories::{period, product};

/// Error types for financial record operations.
#[derive(Debug, thiserror::Error)]
pub enum FinancialError {
    /// The referenced product name does not exist. Surfaces as a
    /// validation error to callers, not a crash.
    #[error("invalid product name: {0}")]
    UnknownProduct(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Optional numeric metrics for a financial record. All fields nullable.
#[derive(Debug, Clone, Default)]
pub struct FinancialMetrics {
    /// Sales volume.
    pub sales_volume: Option<Decimal>,
    /// Production volume.
    pub production_volume: Option<Decimal>,
    /// Turnover in EUR.
    pub turnover_eur: Option<Decimal>,
    /// Raw material and packaging cost.
    pub rmpm_cost: Option<Decimal>,
    /// Operating cost.
    pub operating_cost: Option<Decimal>,
    /// Net profit.
    pub net_profit: Option<Decimal>,
    /// Net margin ratio.
    pub net_margin: Option<Decimal>,
    /// Contributive margin.
    pub contributive_margin: Option<Decimal>,
}

/// Denormalized financial row as returned by the list read.
#[derive(Debug, Clone, FromQueryResult, Serialize)]
pub struct FinancialJoinedRow {
    /// Period date.
    pub period_date: NaiveDate,
    /// Period type (e.g. "Monthly").
    pub period_type: String,
    /// Fiscal year label.
    pub fiscal_year: String,
    /// Product name.
    pub product_name: String,
    /// Sales volume.
    pub sales_volume: Option<Decimal>,
    /// Production volume.
    pub production_volume: Option<Decimal>,
    /// Turnover in EUR.
    pub turnover_eur: Option<Decimal>,
    /// Net profit.
    pub net_profit: Option<Decimal>,
    /// Net margin ratio.
    pub net_margin: Option<Decimal>,
    /// Contributive margin.
    pub contributive_margin: Option<Decimal>,
}

/// A (period date, sales volume) pair for forecast history.
#[derive(Debug, Clone, FromQueryResult, Serialize)]
pub struct SalesHistoryRow {
    /// Period date.
    pub period_date: NaiveDate,
    /// Sales volume for that period.
    pub sales_volume: Option<Decimal>,
}

/// Inserts a financial record on any connection, including an open
/// transaction.
///
/// # Errors
///
/// Returns an error if the database insert fails.
pub async fn insert_row<C: ConnectionTrait>(
    conn: &C,
    period_id: i32,
    product_id: i32,
    metrics: FinancialMetrics,
) -> Result<financial_data::Model, DbErr> {
    let record = financial_data::ActiveModel {
        period_id: Set(period_id),
        product_id: Set(product_id),
        sales_volume: Set(metrics.sales_volume),
        production_volume: Set(metrics.production_volume),
        turnover_eur: Set(metrics.turnover_eur),
        rmpm_cost: Set(metrics.rmpm_cost),
        operating_cost: Set(metrics.operating_cost),
        net_profit: Set(metrics.net_profit),
        net_margin: Set(metrics.net_margin),
        contributive_margin: Set(metrics.contributive_margin),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };

    record.insert(conn).await
}

/// Financial record repository.
#[derive(Debug, Clone)]
pub struct FinancialRepository {
    db: DatabaseConnection,
}

impl FinancialRepository {
    /// Creates a new financial repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a financial record for a date and product name, upserting
    /// the period first. Period upsert and record insert run in one
    /// transaction so a crash cannot leave a period without its row.
    ///
    /// # Errors
    ///
    /// Returns `FinancialError::UnknownProduct` if the product name does
    /// not exist; `FinancialError::Database` on store failures.
    pub async fn insert_for(
        &self,
        period_date: NaiveDate,
        product_name: &str,
        metrics: FinancialMetrics,
    ) -> Result<financial_data::Model, FinancialError> {
        let txn = self.db.begin().await?;

        let period = period::upsert(&txn, period_date, "Monthly", None).await?;

        let Some(product) = product::find_by_name(&txn, product_name).await? else {
            txn.rollback().await?;
            return Err(FinancialError::UnknownProduct(product_name.to_string()));
        };

        let record = insert_row(&txn, period.id, product.id, metrics).await?;

        txn.commit().await?;
        Ok(record)
    }

    /// Lists denormalized financial rows, newest period first, capped at
    /// `limit` rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, limit: u64) -> Result<Vec<FinancialJoinedRow>, DbErr> {
        financial_data::Entity::find()
            .join(JoinType::InnerJoin, financial_data::Relation::Periods.def())
            .join(JoinType::InnerJoin, financial_data::Relation::Products.def())
            .select_only()
            .column(periods::Column::PeriodDate)
            .column(periods::Column::PeriodType)
            .column(periods::Column::FiscalYear)
            .column_as(products::Column::Name, "product_name")
            .column(financial_data::Column::SalesVolume)
            .column(financial_data::Column::ProductionVolume)
            .column(financial_data::Column::TurnoverEur)
            .column(financial_data::Column::NetProfit)
            .column(financial_data::Column::NetMargin)
            .column(financial_data::Column::ContributiveMargin)
            .order_by_desc(periods::Column::PeriodDate)
            .limit(limit)
            .into_model::<FinancialJoinedRow>()
            .all(&self.db)
            .await
    }

    /// Returns a product's sales history, newest period first.
    ///
    /// # Errors
    ///
    /// Returns `FinancialError::UnknownProduct` if the product name does
    /// not exist; `FinancialError::Database` on store failures.
    pub async fn sales_history(
        &self,
        product_name: &str,
        limit: u64,
    ) -> Result<Vec<SalesHistoryRow>, FinancialError> {
        let Some(product) = product::find_by_name(&self.db, product_name).await? else {
            return Err(FinancialError::UnknownProduct(product_name.to_string()));
        };

        let rows = financial_data::Entity::find()
            .filter(financial_data::Column::ProductId.eq(product.id))
            .join(JoinType::InnerJoin, financial_data::Relation::Periods.def())
            .select_only()
            .column(periods::Column::PeriodDate)
            .column(financial_data::Column::SalesVolume)
            .order_by_desc(periods::Column::PeriodDate)
            .limit(limit)
            .into_model::<SalesHistoryRow>()
            .all(&self.db)
            .await?;

        Ok(rows)
    }
}
