//! KPI record repository.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::Serialize;

use crate::entities::{kpi_data, periods};

/// Denormalized KPI row as returned by the list read.
#[derive(Debug, Clone, FromQueryResult, Serialize)]
pub struct KpiJoinedRow {
    /// Period date.
    pub period_date: NaiveDate,
    /// KPI name.
    pub kpi_name: String,
    /// Target value.
    pub target_value: Option<Decimal>,
    /// Actual value.
    pub actual_value: Option<Decimal>,
    /// Display unit.
    pub unit: Option<String>,
}

/// KPI record repository.
#[derive(Debug, Clone)]
pub struct KpiRepository {
    db: DatabaseConnection,
}

impl KpiRepository {
    /// Creates a new KPI repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a KPI record. No dedup is applied; repeated inserts create
    /// additional rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn insert(
        &self,
        period_id: i32,
        kpi_name: &str,
        target_value: Option<Decimal>,
        actual_value: Option<Decimal>,
        unit: Option<String>,
    ) -> Result<kpi_data::Model, DbErr> {
        let record = kpi_data::ActiveModel {
            period_id: Set(period_id),
            kpi_name: Set(kpi_name.to_string()),
            target_value: Set(target_value),
            actual_value: Set(actual_value),
            unit: Set(unit),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        };

        record.insert(&self.db).await
    }

    /// Lists denormalized KPI rows, newest period first then KPI name
    /// ascending, capped at `limit` rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, limit: u64) -> Result<Vec<KpiJoinedRow>, DbErr> {
        kpi_data::Entity::find()
            .join(JoinType::InnerJoin, kpi_data::Relation::Periods.def())
            .select_only()
            .column(periods::Column::PeriodDate)
            .column(kpi_data::Column::KpiName)
            .column(kpi_data::Column::TargetValue)
            .column(kpi_data::Column::ActualValue)
            .column(kpi_data::Column::Unit)
            .order_by_desc(periods::Column::PeriodDate)
            .order_by_asc(kpi_data::Column::KpiName)
            .limit(limit)
            .into_model::<KpiJoinedRow>()
            .all(&self.db)
            .await
    }

    /// Returns the KPI rows belonging to the given period only. Used by the
    /// weekly alert job with the most recent period.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn for_period(&self, period_id: i32) -> Result<Vec<kpi_data::Model>, DbErr> {
        kpi_data::Entity::find()
            .filter(kpi_data::Column::PeriodId.eq(period_id))
            .order_by_asc(kpi_data::Column::KpiName)
            .all(&self.db)
            .await
    }
}
