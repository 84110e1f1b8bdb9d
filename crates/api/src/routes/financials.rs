//! Financial and KPI data routes.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::{AppState, response};
use finboard_db::repositories::{FinancialError, FinancialMetrics};
use finboard_db::{FinancialRepository, KpiRepository};

/// Maximum rows returned by the public list reads.
const LIST_LIMIT: u64 = 50;

/// Request body for creating one financial record. All numeric metrics are
/// optional; period date and product name are required.
#[derive(Debug, Deserialize)]
pub struct CreateFinancialRequest {
    /// Reporting period date (YYYY-MM-DD).
    pub period_date: Option<NaiveDate>,
    /// Product business key.
    pub product_name: Option<String>,
    /// Sales volume.
    pub sales_volume: Option<Decimal>,
    /// Production volume.
    pub production_volume: Option<Decimal>,
    /// Turnover in EUR.
    pub turnover_eur: Option<Decimal>,
    /// Raw material and packaging cost.
    pub rmpm_cost: Option<Decimal>,
    /// Operating cost.
    pub operating_cost: Option<Decimal>,
    /// Net profit.
    pub net_profit: Option<Decimal>,
    /// Net margin ratio.
    pub net_margin: Option<Decimal>,
}

/// GET /api/financials - Denormalized financial rows, newest first.
async fn list_financials(State(state): State<AppState>) -> impl IntoResponse {
    let repo = FinancialRepository::new((*state.db).clone());

    match repo.list(LIST_LIMIT).await {
        Ok(rows) => Json(json!({
            "success": true,
            "count": rows.len(),
            "data": rows,
        }))
        .into_response(),
        Err(e) => {
            error!(error = %e, "Financial data fetch failed");
            response::internal_error("Failed to fetch financial data", e)
        }
    }
}

/// GET /api/kpis - Denormalized KPI rows, newest first then name.
async fn list_kpis(State(state): State<AppState>) -> impl IntoResponse {
    let repo = KpiRepository::new((*state.db).clone());

    match repo.list(LIST_LIMIT).await {
        Ok(rows) => Json(json!({
            "success": true,
            "count": rows.len(),
            "data": rows,
        }))
        .into_response(),
        Err(e) => {
            error!(error = %e, "KPI data fetch failed");
            response::internal_error("Failed to fetch KPI data", e)
        }
    }
}

/// POST /api/financials - Create one financial record, upserting its period.
async fn create_financial(
    State(state): State<AppState>,
    Json(payload): Json<CreateFinancialRequest>,
) -> impl IntoResponse {
    let (Some(period_date), Some(product_name)) = (payload.period_date, &payload.product_name)
    else {
        return response::bad_request("Period date and product name are required");
    };

    let metrics = FinancialMetrics {
        sales_volume: payload.sales_volume,
        production_volume: payload.production_volume,
        turnover_eur: payload.turnover_eur,
        rmpm_cost: payload.rmpm_cost,
        operating_cost: payload.operating_cost,
        net_profit: payload.net_profit,
        net_margin: payload.net_margin,
        contributive_margin: None,
    };

    let repo = FinancialRepository::new((*state.db).clone());
    match repo.insert_for(period_date, product_name, metrics).await {
        Ok(record) => Json(json!({
            "success": true,
            "message": "Financial data saved successfully!",
            "data": record,
        }))
        .into_response(),
        Err(FinancialError::UnknownProduct(_)) => response::bad_request("Invalid product name"),
        Err(FinancialError::Database(e)) => {
            error!(error = %e, "Error saving financial data");
            response::internal_error("Failed to save financial data", e)
        }
    }
}

/// Creates the financial data routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/financials", get(list_financials).post(create_financial))
        .route("/kpis", get(list_kpis))
}
