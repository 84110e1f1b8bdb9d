//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. They are constructed with an explicit connection handle
//! (dependency injection), never an ambient global.

pub mod financial;
pub mod kpi;
pub mod period;
pub mod product;
pub mod user;

pub use financial::{
    FinancialError, FinancialJoinedRow, FinancialMetrics, FinancialRepository,
};
pub use kpi::{KpiJoinedRow, KpiRepository};
pub use period::PeriodRepository;
pub use product::ProductRepository;
pub use user::{UserRepository, UserSummary};
