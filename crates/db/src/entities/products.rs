//! `SeaORM` Entity for the products table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Unique business key.
    #[sea_orm(unique)]
    pub name: String,
    pub category: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::financial_data::Entity")]
    FinancialData,
}

impl Related<super::financial_data::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FinancialData.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
