//! Error types for the Menu API.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  source                          code                    status         │
//! │  ──────                          ────                    ──────         │
//! │  malformed JSON / bad fields     INVALID_REQUEST         400            │
//! │  ValidationError                 VALIDATION_FAILED       400            │
//! │  unknown item / variant          MENU_ITEM_NOT_FOUND     400            │
//! │  empty order, unavailable item   ORDER_REJECTED          400            │
//! │  amount out of range             ORDER_REJECTED          400            │
//! │  DbError::NotFound               NOT_FOUND               404            │
//! │  illegal status change           INVALID_TRANSITION      409            │
//! │  unique violation, stale write   CONFLICT                409            │
//! │  everything else                 INTERNAL_ERROR          500            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal failures are logged with their detail and answered with a
//! generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use resort_core::CoreError;
use resort_db::DbError;

/// JSON error body: `{"code": "...", "message": "..."}`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        ApiError {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn internal() -> Self {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "Internal server error",
        )
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::Validation(_) => {
                ApiError::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", message)
            }
            CoreError::MenuItemNotFound(_) | CoreError::VariantNotFound { .. } => {
                ApiError::new(StatusCode::BAD_REQUEST, "MENU_ITEM_NOT_FOUND", message)
            }
            CoreError::ItemUnavailable(_)
            | CoreError::EmptyOrder
            | CoreError::AmountOverflow { .. }
            | CoreError::CartTooLarge { .. }
            | CoreError::QuantityTooLarge { .. } => {
                ApiError::new(StatusCode::BAD_REQUEST, "ORDER_REJECTED", message)
            }
            CoreError::OrderNotFound(_) => ApiError::not_found(message),
            CoreError::InvalidStatusTransition { .. } => {
                ApiError::new(StatusCode::CONFLICT, "INVALID_TRANSITION", message)
            }
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::not_found(err.to_string()),
            DbError::UniqueViolation { .. } | DbError::Conflict { .. } => {
                ApiError::new(StatusCode::CONFLICT, "CONFLICT", err.to_string())
            }
            DbError::ForeignKeyViolation { .. } => {
                ApiError::bad_request("Order references a menu item that no longer exists")
            }
            other => {
                error!(error = %other, "Database error");
                ApiError::internal()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resort_core::ValidationError;

    #[test]
    fn test_core_error_statuses() {
        let cases: Vec<(CoreError, StatusCode, &str)> = vec![
            (CoreError::EmptyOrder, StatusCode::BAD_REQUEST, "ORDER_REJECTED"),
            (
                CoreError::AmountOverflow { field: "total" },
                StatusCode::BAD_REQUEST,
                "ORDER_REJECTED",
            ),
            (
                CoreError::MenuItemNotFound("x".into()),
                StatusCode::BAD_REQUEST,
                "MENU_ITEM_NOT_FOUND",
            ),
            (
                CoreError::Validation(ValidationError::Required {
                    field: "lines".into(),
                }),
                StatusCode::BAD_REQUEST,
                "VALIDATION_FAILED",
            ),
            (
                CoreError::InvalidStatusTransition {
                    kind: "order",
                    from: "served".into(),
                    to: "pending".into(),
                },
                StatusCode::CONFLICT,
                "INVALID_TRANSITION",
            ),
            (
                CoreError::OrderNotFound("o".into()),
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
            ),
        ];

        for (err, status, code) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status, status);
            assert_eq!(api.code, code);
        }
    }

    #[test]
    fn test_internal_db_errors_hide_detail() {
        let api: ApiError = DbError::QueryFailed("near \"SELEC\": syntax error".into()).into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "Internal server error");

        let api: ApiError = DbError::not_found("Order", "abc").into();
        assert_eq!(api.status, StatusCode::NOT_FOUND);

        let api: ApiError = DbError::conflict("Order", "abc").into();
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert_eq!(api.code, "CONFLICT");
    }

    #[test]
    fn test_body_shape() {
        let body = serde_json::to_value(ApiError::bad_request("lines is required")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"code": "INVALID_REQUEST", "message": "lines is required"})
        );
    }
}
