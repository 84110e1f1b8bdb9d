//! Core business logic for Finboard.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain rules and calculations live here.
//!
//! # Modules
//!
//! - `auth` - Password hashing and role definitions
//! - `fiscal` - Fiscal year resolution from calendar dates
//! - `forecast` - Moving-average volume projections
//! - `import` - CSV row transformation for bulk imports
//! - `kpi` - KPI underperformance rules and alert rendering

pub mod auth;
pub mod fiscal;
pub mod forecast;
pub mod import;
pub mod kpi;
