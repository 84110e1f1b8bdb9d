//! Liveness, connectivity, and bootstrap endpoints.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use sea_orm::{ConnectionTrait, Statement};
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, response};
use finboard_db::migration::{Migrator, MigratorTrait};
use finboard_db::seed;

fn run_mode() -> String {
    std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string())
}

/// GET /api/health - Liveness probe.
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": run_mode(),
    }))
}

/// GET /api/test-db - Database connectivity probe.
async fn test_db(State(state): State<AppState>) -> impl IntoResponse {
    let stmt = Statement::from_string(
        state.db.get_database_backend(),
        "SELECT NOW()::text AS current_time",
    );

    match state.db.query_one(stmt).await {
        Ok(Some(row)) => {
            let timestamp: String = row.try_get("", "current_time").unwrap_or_default();
            Json(json!({
                "success": true,
                "message": "Database connected successfully!",
                "timestamp": timestamp,
                "environment": run_mode(),
            }))
            .into_response()
        }
        Ok(None) => response::internal_error("Database connection failed", "empty result"),
        Err(e) => {
            error!(error = %e, "Database test failed");
            response::internal_error("Database connection failed", e)
        }
    }
}

/// GET /api/init-db - Idempotent schema and seed bootstrap.
async fn init_db(State(state): State<AppState>) -> impl IntoResponse {
    if let Err(e) = Migrator::up(state.db.as_ref(), None).await {
        error!(error = %e, "Database initialization failed");
        return response::internal_error("Database initialization failed", e);
    }

    if let Err(e) = seed::apply(state.db.as_ref()).await {
        error!(error = %e, "Database seeding failed");
        return response::internal_error("Database initialization failed", e);
    }

    info!("Database initialized");
    Json(json!({
        "success": true,
        "message": "Database initialized successfully!",
        "tables": ["products", "periods", "financial_data", "kpi_data", "users"],
    }))
    .into_response()
}

/// Creates the health and bootstrap routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/test-db", get(test_db))
        .route("/init-db", get(init_db))
}
