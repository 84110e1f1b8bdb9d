//! Response helpers for the structured JSON error contract.
//!
//! Every handler catches component-level errors at the boundary and
//! converts them to `{success: false, error, details?}` JSON; nothing is
//! allowed to crash the process.

use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde_json::json;

use finboard_shared::AppError;

/// Converts an `AppError` into the structured JSON error response.
#[must_use]
pub fn app_error(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "success": false,
            "error": err.error_code(),
            "details": err.to_string(),
        })),
    )
        .into_response()
}

/// A 500 response with a fixed error string and the underlying message as
/// details, matching the deployed error bodies.
#[must_use]
pub fn internal_error(error: &str, details: impl std::fmt::Display) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "error": error,
            "details": details.to_string(),
        })),
    )
        .into_response()
}

/// A 400 validation failure with a human-readable error string.
#[must_use]
pub fn bad_request(error: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "success": false,
            "error": error,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_status_mapping() {
        let res = app_error(&AppError::Unauthorized("bad token".into()));
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = app_error(&AppError::Forbidden("role".into()));
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = app_error(&AppError::Validation("field".into()));
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = app_error(&AppError::Database("down".into()));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bad_request_is_400() {
        let res = bad_request("Period date and product name are required");
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
