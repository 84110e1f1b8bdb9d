//! `SeaORM` Entity for the periods table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "periods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub period_date: Date,
    pub period_type: String,
    /// Derived fiscal-year label, e.g. "2025-26".
    pub fiscal_year: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::financial_data::Entity")]
    FinancialData,
    #[sea_orm(has_many = "super::kpi_data::Entity")]
    KpiData,
}

impl Related<super::financial_data::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FinancialData.def()
    }
}

impl Related<super::kpi_data::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::KpiData.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
