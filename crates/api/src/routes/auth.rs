//! Authentication routes for register, login, and the current principal.
//!
//! All credential failures surface as the same generic invalid-credentials
//! response so callers cannot distinguish "email not found" from "wrong
//! password".

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tracing::{error, info};

use crate::middleware::AuthUser;
use crate::{AppState, response};
use finboard_core::auth::{UserRole, hash_password, verify_password};
use finboard_db::UserRepository;
use finboard_shared::auth::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
}

/// Creates the auth routes that require the auth middleware.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "success": false,
            "error": "Invalid credentials"
        })),
    )
        .into_response()
}

fn user_already_exists() -> axum::response::Response {
    (
        StatusCode::CONFLICT,
        Json(json!({
            "success": false,
            "error": "User already exists"
        })),
    )
        .into_response()
}

/// POST /api/auth/login - Authenticate a user and return a session token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    if payload.email.is_empty() || payload.password.is_empty() {
        return response::bad_request("Email and password are required");
    }

    let user_repo = UserRepository::new((*state.db).clone());

    // Inactive and unknown accounts take the same path as a bad password.
    let user = match user_repo.find_active_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for unknown or inactive user");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return response::internal_error("Login failed", e);
        }
    };

    match verify_password(&payload.password, &user.password) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = user.id, "Failed login attempt - invalid password");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return response::internal_error("Login failed", e);
        }
    }

    if let Err(e) = user_repo.touch_last_login(user.id).await {
        error!(error = %e, "Failed to update last login");
        return response::internal_error("Login failed", e);
    }

    let token = match state
        .jwt_service
        .generate_token(user.id, &user.email, &user.role)
    {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate token");
            return response::internal_error("Login failed", e);
        }
    };

    Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        user: UserInfo {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        },
    })
    .into_response()
}

/// POST /api/auth/register - Create a user and return a session token.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    if payload.email.is_empty() || payload.password.is_empty() {
        return response::bad_request("Email and password are required");
    }

    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.email_exists(&payload.email).await {
        Ok(true) => return user_already_exists(),
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error during registration");
            return response::internal_error("Registration failed", e);
        }
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Password hashing failed");
            return response::internal_error("Registration failed", e);
        }
    };

    let name = payload.name.unwrap_or_else(|| payload.email.clone());
    let role = payload
        .role
        .as_deref()
        .and_then(|r| r.parse::<UserRole>().ok())
        .unwrap_or_default();

    let user = match user_repo
        .create(&payload.email, &password_hash, &name, role.as_str())
        .await
    {
        Ok(u) => u,
        // A concurrent registration can slip in between the existence
        // check and the insert; the unique index reports it here.
        Err(e) if matches!(e.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) => {
            info!(email = %payload.email, "Registration raced an existing account");
            return user_already_exists();
        }
        Err(e) => {
            error!(error = %e, "Failed to create user");
            return response::internal_error("Registration failed", e);
        }
    };

    let token = match state
        .jwt_service
        .generate_token(user.id, &user.email, &user.role)
    {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate token");
            return response::internal_error("Registration failed", e);
        }
    };

    info!(user_id = user.id, "User registered");
    Json(LoginResponse {
        success: true,
        message: "Registration successful".to_string(),
        token,
        user: UserInfo {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        },
    })
    .into_response()
}

/// GET /api/auth/me - Return the authenticated principal.
async fn me(auth: AuthUser) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "user": auth.principal(),
    }))
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, header::CONTENT_TYPE},
    };
    use http_body_util::BodyExt;
    use sea_orm::{ActiveModelTrait, ActiveValue::Set, IntoActiveModel};
    use std::sync::Arc;
    use tower::ServiceExt;

    use finboard_db::entities::users;
    use finboard_db::migration::{Migrator, MigratorTrait};
    use finboard_shared::config::{EmailConfig, TokenVerification};
    use finboard_shared::{EmailService, JwtConfig, JwtService};

    const PASSWORD: &str = "correct-horse-battery";

    /// Needs a running Postgres; skips itself when `DATABASE_URL` is unset.
    async fn test_state() -> Option<AppState> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set; skipping integration test");
            return None;
        };

        let db = finboard_db::connect(&url, 5)
            .await
            .expect("Failed to connect to database");
        Migrator::up(&db, None).await.expect("Migration failed");

        Some(AppState {
            db: Arc::new(db),
            jwt_service: Arc::new(JwtService::new(JwtConfig::default())),
            email_service: Arc::new(EmailService::new(EmailConfig::default())),
            token_verification: TokenVerification::VerifyAgainstStore,
        })
    }

    fn unique_email(tag: &str) -> String {
        format!(
            "{tag}-{}@hilinafoods.com",
            chrono::Utc::now().timestamp_micros()
        )
    }

    async fn create_user(state: &AppState, email: &str) -> users::Model {
        let repo = UserRepository::new((*state.db).clone());
        let hash = hash_password(PASSWORD).unwrap();
        repo.create(email, &hash, "Test User", "viewer")
            .await
            .expect("Failed to create user")
    }

    async fn post_json(
        state: AppState,
        path: &str,
        body: serde_json::Value,
    ) -> (StatusCode, Vec<u8>) {
        let app = Router::new().merge(routes()).with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(path)
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn post_login(state: AppState, email: &str, password: &str) -> (StatusCode, Vec<u8>) {
        post_json(
            state,
            "/auth/login",
            json!({ "email": email, "password": password }),
        )
        .await
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let Some(state) = test_state().await else { return };

        let known = unique_email("login-known");
        create_user(&state, &known).await;

        let inactive = unique_email("login-inactive");
        let dormant = create_user(&state, &inactive).await;
        let mut dormant = dormant.into_active_model();
        dormant.is_active = Set(false);
        dormant.update(&*state.db).await.expect("Deactivate failed");

        let (wrong_pw_status, wrong_pw_body) =
            post_login(state.clone(), &known, "not-the-password").await;
        let (unknown_status, unknown_body) =
            post_login(state.clone(), &unique_email("login-ghost"), PASSWORD).await;
        let (inactive_status, inactive_body) = post_login(state.clone(), &inactive, PASSWORD).await;

        // Wrong password, unknown email, and a deactivated account must
        // all produce the same status and the same body, so a caller
        // cannot enumerate accounts.
        assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
        assert_eq!(inactive_status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_pw_body, unknown_body);
        assert_eq!(wrong_pw_body, inactive_body);

        // The account itself is untouched and still logs in.
        let (ok_status, _) = post_login(state, &known, PASSWORD).await;
        assert_eq!(ok_status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_issues_token_and_stamps_last_login() {
        let Some(state) = test_state().await else { return };

        let email = unique_email("login-stamp");
        let user = create_user(&state, &email).await;
        assert!(user.last_login.is_none());

        let (status, body) = post_login(state.clone(), &email, PASSWORD).await;
        assert_eq!(status, StatusCode::OK);

        let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let token = payload["token"].as_str().expect("Token missing");
        let claims = state.jwt_service.validate_token(token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, email);

        let repo = UserRepository::new((*state.db).clone());
        let refreshed = repo
            .find_by_id(user.id)
            .await
            .unwrap()
            .expect("User should still exist");
        assert!(refreshed.last_login.is_some());
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let Some(state) = test_state().await else { return };

        let email = unique_email("register-dup");
        let body = json!({ "email": email, "password": PASSWORD });

        let (first, _) = post_json(state.clone(), "/auth/register", body.clone()).await;
        assert_eq!(first, StatusCode::OK);

        let (second, second_body) = post_json(state, "/auth/register", body).await;
        assert_eq!(second, StatusCode::CONFLICT);
        let payload: serde_json::Value = serde_json::from_slice(&second_body).unwrap();
        assert_eq!(payload["error"], "User already exists");
    }
}
