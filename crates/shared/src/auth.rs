//! Authentication types for JWT claims and auth payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JWT claims for session tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: i32,
    /// User email.
    pub email: String,
    /// User role.
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: i32, email: &str, role: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email: email.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> i32 {
        self.sub
    }
}

/// The authenticated identity attached to a request after token
/// verification (and, depending on configuration, a store re-check).
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    /// User ID.
    pub id: i32,
    /// User email.
    pub email: String,
    /// User role.
    pub role: String,
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
    /// User display name.
    pub name: Option<String>,
    /// Requested role; defaults to viewer.
    pub role: Option<String>,
}

/// User info returned in auth responses. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: i32,
    /// User email.
    pub email: String,
    /// User display name.
    pub name: String,
    /// User role.
    pub role: String,
}

/// Login/registration response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Human-readable message.
    pub message: String,
    /// Signed session token.
    pub token: String,
    /// Authenticated user info.
    pub user: UserInfo,
}
