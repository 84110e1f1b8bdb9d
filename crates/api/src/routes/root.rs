//! Service banner and endpoint index.

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::AppState;

/// GET / - Service banner with an index of the main endpoints.
async fn index() -> Json<Value> {
    Json(json!({
        "message": "Executive Dashboard API",
        "status": "Running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /api/health",
            "testDb": "GET /api/test-db",
            "initDb": "GET /api/init-db",
            "financials": "GET /api/financials",
            "kpis": "GET /api/kpis",
            "addData": "POST /api/financials",
            "register": "POST /api/auth/register",
            "login": "POST /api/auth/login",
            "me": "GET /api/auth/me",
            "users": "GET /api/admin/users",
            "import": "POST /api/import/financial-data",
            "forecast": "GET /api/analytics/forecast"
        }
    }))
}

/// Creates the root route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(index))
}
