//! Bulk CSV import of financial records.
//!
//! The upload is consumed in memory and dropped when the request
//! completes, so no temporary artifact outlives the import. Per-row
//! failures never fail the request: the summary itemizes them and the
//! response is always 200 once a file was supplied.

use axum::{
    Json, Router, extract::{Multipart, State}, response::IntoResponse, routing::post,
};
use serde_json::json;
use tracing::{error, info};

use crate::middleware::{AuthUser, require_role};
use crate::{AppState, response};
use finboard_core::auth::UserRole;
use finboard_core::import::{FinancialRow, RowError, parse_financial_csv};
use finboard_db::FinancialRepository;
use finboard_db::repositories::{FinancialError, FinancialMetrics};

fn metrics_from(row: &FinancialRow) -> FinancialMetrics {
    FinancialMetrics {
        sales_volume: row.sales_volume,
        production_volume: row.production_volume,
        turnover_eur: row.turnover,
        rmpm_cost: row.rmpm_cost,
        operating_cost: row.operating_cost,
        net_profit: row.net_profit,
        net_margin: row.net_margin,
        contributive_margin: row.contributive_margin,
    }
}

/// POST /api/import/financial-data - Import a CSV of financial records.
async fn import_financial_data(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> impl IntoResponse {
    if let Err(forbidden) = require_role(&auth, UserRole::can_import_data) {
        return forbidden;
    }

    // Locate the `file` part of the upload.
    let mut content = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => {
                match field.bytes().await {
                    Ok(bytes) => {
                        content = Some(bytes);
                        break;
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to read uploaded file");
                        return response::bad_request("Failed to read uploaded file");
                    }
                }
            }
            Ok(Some(_)) => {}
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "Malformed multipart upload");
                return response::bad_request("Malformed multipart upload");
            }
        }
    }

    let Some(content) = content else {
        return response::bad_request("A CSV file is required in the 'file' field");
    };

    let parsed = match parse_financial_csv(content.as_ref()) {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "CSV header could not be read");
            return response::bad_request("File is not a readable CSV");
        }
    };

    let repo = FinancialRepository::new((*state.db).clone());
    let mut successful = 0usize;
    let mut errors = parsed.errors;

    for (row_number, row) in parsed.rows {
        match repo
            .insert_for(row.period_date, &row.product_name, metrics_from(&row))
            .await
        {
            Ok(_) => successful += 1,
            Err(FinancialError::UnknownProduct(name)) => errors.push(RowError {
                row: row_number,
                error: format!("invalid product name: {name}"),
            }),
            Err(FinancialError::Database(e)) => errors.push(RowError {
                row: row_number,
                error: format!("insert failed: {e}"),
            }),
        }
    }

    info!(
        user_id = auth.user_id(),
        total = parsed.total,
        successful,
        failed = errors.len(),
        "Financial data import completed"
    );

    Json(json!({
        "success": true,
        "message": "Import completed",
        "summary": {
            "total_records": parsed.total,
            "successful": successful,
            "failed": errors.len(),
            "errors": errors,
        }
    }))
    .into_response()
}

/// Creates the import routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/import/financial-data", post(import_financial_data))
}
