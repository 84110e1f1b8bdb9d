//! Administrative routes.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde_json::json;
use tracing::error;

use crate::middleware::{AuthUser, require_role};
use crate::{AppState, response};
use finboard_core::auth::UserRole;
use finboard_db::UserRepository;

/// GET /api/admin/users - List users without password hashes.
async fn list_users(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(forbidden) = require_role(&auth, UserRole::can_manage_users) {
        return forbidden;
    }

    let repo = UserRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(users) => Json(json!({
            "success": true,
            "count": users.len(),
            "data": users,
        }))
        .into_response(),
        Err(e) => {
            error!(error = %e, "User list fetch failed");
            response::internal_error("Failed to fetch users", e)
        }
    }
}

/// Creates the admin routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/admin/users", get(list_users))
}
