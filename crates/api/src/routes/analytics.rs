//! Volume forecast endpoint.

use axum::{
    Json, Router, extract::{Query, State}, response::IntoResponse, routing::get,
};
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::middleware::AuthUser;
use crate::{AppState, response};
use finboard_core::forecast::moving_average_forecast;
use finboard_db::FinancialRepository;
use finboard_db::repositories::FinancialError;

/// Default forecast horizon when `periods` is not given.
const DEFAULT_PERIODS: usize = 3;

/// Longest accepted forecast horizon. The projection loop and its output
/// grow with this value, so the query parameter must never reach it
/// unbounded.
const MAX_FORECAST_PERIODS: usize = 12;

/// How many trailing periods of history feed the projection.
const HISTORY_LIMIT: u64 = 12;

#[derive(Debug, Deserialize)]
struct ForecastParams {
    product: Option<String>,
    periods: Option<usize>,
}

/// GET /api/analytics/forecast - Moving-average volume projection for one
/// product.
async fn sales_forecast(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<ForecastParams>,
) -> impl IntoResponse {
    let Some(product) = params.product.filter(|p| !p.is_empty()) else {
        return response::bad_request("Query parameter 'product' is required");
    };
    let periods = params.periods.unwrap_or(DEFAULT_PERIODS);
    if periods == 0 || periods > MAX_FORECAST_PERIODS {
        return response::bad_request("Query parameter 'periods' must be between 1 and 12");
    }

    let repo = FinancialRepository::new((*state.db).clone());
    let rows = match repo.sales_history(&product, HISTORY_LIMIT).await {
        Ok(rows) => rows,
        Err(FinancialError::UnknownProduct(_)) => {
            return response::bad_request("Invalid product name");
        }
        Err(FinancialError::Database(e)) => {
            error!(error = %e, product, "Failed to load sales history");
            return response::internal_error("Database error", &e.to_string());
        }
    };

    // Rows come back newest first; the projection wants chronological order.
    let history: Vec<f64> = rows
        .iter()
        .rev()
        .filter_map(|row| row.sales_volume.as_ref().and_then(ToPrimitive::to_f64))
        .collect();

    if history.is_empty() {
        return response::bad_request("No sales history available for this product");
    }

    let forecast = moving_average_forecast(&history, periods);

    let historical: Vec<_> = rows.iter().rev().collect();
    Json(json!({
        "success": true,
        "product": product,
        "historical": historical,
        "forecast": forecast,
        "generated_at": chrono::Utc::now().to_rfc3339(),
    }))
    .into_response()
}

/// Creates the analytics routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/analytics/forecast", get(sales_forecast))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header::AUTHORIZATION},
        middleware::from_fn_with_state,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::middleware::auth::auth_middleware;
    use finboard_shared::config::{EmailConfig, TokenVerification};
    use finboard_shared::{EmailService, JwtConfig, JwtService};

    /// State with a disconnected store; requests rejected by validation
    /// must produce 400 before any query is attempted.
    fn offline_state() -> AppState {
        AppState {
            db: Arc::new(sea_orm::DatabaseConnection::default()),
            jwt_service: Arc::new(JwtService::new(JwtConfig::default())),
            email_service: Arc::new(EmailService::new(EmailConfig::default())),
            token_verification: TokenVerification::TrustToken,
        }
    }

    fn app(state: AppState) -> axum::Router {
        axum::Router::new()
            .merge(routes())
            .layer(from_fn_with_state(state.clone(), auth_middleware))
            .with_state(state)
    }

    fn viewer_token(state: &AppState) -> String {
        state
            .jwt_service
            .generate_token(1, "viewer@hilinafoods.com", "viewer")
            .unwrap()
    }

    async fn get_forecast(query: &str) -> StatusCode {
        let state = offline_state();
        let token = viewer_token(&state);

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri(format!("/analytics/forecast?{query}"))
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        response.status()
    }

    #[tokio::test]
    async fn test_oversized_horizon_is_rejected() {
        // usize::MAX used to reach the projection loop and abort the
        // process with a capacity overflow; it must be a plain 400 now.
        let status = get_forecast(&format!("product=Plumpy*Nut&periods={}", usize::MAX)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let status = get_forecast("product=Plumpy*Nut&periods=100000000000").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let status = get_forecast("product=Plumpy*Nut&periods=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_product_is_rejected() {
        let status = get_forecast("periods=3").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_forecast_requires_a_token() {
        let state = offline_state();
        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/analytics/forecast?product=Plumpy*Nut")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
