//! Shared types, errors, and configuration for Finboard.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and token service
//! - Auth request/response payloads
//! - SMTP email service for scheduled alerts

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod jwt;

pub use config::AppConfig;
pub use email::EmailService;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
