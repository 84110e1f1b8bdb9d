//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with bcrypt
//! - Password verification
//! - User role definitions and role-based access checks

mod password;

pub use password::{PasswordError, hash_password, verify_password};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// User roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access including user administration.
    Admin,
    /// Can manage financial data and imports.
    Finance,
    /// Read-only access.
    Viewer,
}

impl UserRole {
    /// Returns true if this role can list users.
    #[must_use]
    pub const fn can_manage_users(&self) -> bool {
        matches!(self, Self::Admin | Self::Finance)
    }

    /// Returns true if this role can run bulk data imports.
    #[must_use]
    pub const fn can_import_data(&self) -> bool {
        matches!(self, Self::Admin | Self::Finance)
    }

    /// Returns the canonical string form stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Finance => "finance",
            Self::Viewer => "viewer",
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Viewer
    }
}

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "finance" => Ok(Self::Finance),
            "viewer" => Ok(Self::Viewer),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized role string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

/// Parses a stored role string, falling back to viewer for unknown values.
///
/// The users table defaults the role column to `'viewer'`; rows written by
/// older versions may carry arbitrary strings, so reads degrade the same way.
#[must_use]
pub fn role_or_viewer(s: &str) -> UserRole {
    s.parse().unwrap_or_default()
}
