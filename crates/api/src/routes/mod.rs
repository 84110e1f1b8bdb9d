//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod financials;
pub mod health;
pub mod import;
pub mod root;

/// Creates the `/api` router: public routes plus protected routes behind
/// the auth middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(admin::routes())
        .merge(import::routes())
        .merge(analytics::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(financials::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
