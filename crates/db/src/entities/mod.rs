//! `SeaORM` entity definitions.

pub mod financial_data;
pub mod kpi_data;
pub mod periods;
pub mod products;
pub mod users;
