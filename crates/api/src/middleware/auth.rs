//! Authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::AppState;
use finboard_core::auth::{UserRole, role_or_viewer};
use finboard_db::UserRepository;
use finboard_shared::AppError;
use finboard_shared::auth::Principal;
use finboard_shared::config::TokenVerification;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the JWT service
/// 3. Depending on configuration, re-verifies the user against the store so
///    deactivation and role changes take effect immediately
/// 4. Stores the resulting `Principal` in request extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return unauthorized("No token, authorization denied");
    };

    let claims = match state.jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(finboard_shared::JwtError::Expired) => return unauthorized("Token has expired"),
        Err(_) => return unauthorized("Token is not valid"),
    };

    let principal = match state.token_verification {
        TokenVerification::TrustToken => Principal {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        },
        TokenVerification::VerifyAgainstStore => {
            let user_repo = UserRepository::new((*state.db).clone());
            match user_repo.find_by_id(claims.sub).await {
                Ok(Some(user)) if user.is_active => Principal {
                    id: user.id,
                    email: user.email,
                    role: user.role,
                },
                Ok(_) => return unauthorized("Token is not valid"),
                Err(e) => {
                    tracing::error!(error = %e, "Database error during token verification");
                    return crate::response::app_error(&AppError::Database(
                        "An error occurred during authentication".to_string(),
                    ));
                }
            }
        }
    };

    request.extensions_mut().insert(principal);
    next.run(request).await
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "error": message })),
    )
        .into_response()
}

/// Extractor for the authenticated principal.
///
/// Use this in handlers to get the authenticated user:
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     let user_id = auth.user_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl AuthUser {
    /// Returns the user ID.
    #[must_use]
    pub const fn user_id(&self) -> i32 {
        self.0.id
    }

    /// Returns the user's role, defaulting unknown strings to viewer.
    #[must_use]
    pub fn role(&self) -> UserRole {
        role_or_viewer(&self.0.role)
    }

    /// Returns the inner principal.
    #[must_use]
    pub const fn principal(&self) -> &Principal {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "success": false,
                        "error": "No token, authorization denied"
                    })),
                )
            })
    }
}

/// Rejects with 403 unless `check` passes for the principal's role. Pass
/// one of the `UserRole` permission predicates.
///
/// # Errors
///
/// Returns a ready-made 403 response for role mismatches.
pub fn require_role(auth: &AuthUser, check: fn(&UserRole) -> bool) -> Result<(), Response> {
    if check(&auth.role()) {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            Json(json!({
                "success": false,
                "error": "Access denied. Insufficient permissions."
            })),
        )
            .into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_user(role: &str) -> AuthUser {
        AuthUser(Principal {
            id: 1,
            email: "user@hilinafoods.com".to_string(),
            role: role.to_string(),
        })
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("Basic abc123"), None);
    }

    #[test]
    fn test_role_defaults_to_viewer() {
        assert_eq!(auth_user("superuser").role(), UserRole::Viewer);
        assert_eq!(auth_user("finance").role(), UserRole::Finance);
    }

    #[test]
    fn test_require_role() {
        let admin = auth_user("admin");
        assert!(require_role(&admin, UserRole::can_manage_users).is_ok());

        let viewer = auth_user("viewer");
        let err = require_role(&viewer, UserRole::can_import_data).unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }
}
