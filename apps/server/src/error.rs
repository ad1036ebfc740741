//! # HTTP Errors
//!
//! Every handler returns [`ApiResult`]. Failures from the core, the record
//! store and the settings file all funnel into one JSON body:
//!
//! ```text
//!   CoreError ────────┐
//!   ValidationError ──┤
//!   DbError ──────────┼──► ApiError { code, message } ──► status + JSON
//!   SettingsError ────┘
//!
//!   400 {"code":"VALIDATION_ERROR","message":"…"}
//! ```
//!
//! Store and settings failures are logged in full here and reach the
//! client only as a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uriage_core::{CoreError, ValidationError};
use uriage_db::DbError;

use crate::state::SettingsError;

/// Error body sent to the client.
///
/// ```json
/// { "code": "NOT_FOUND", "message": "Product not found: 42" }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub code: ErrorCode,
    /// Shown to the operator as is; Japanese for entry mistakes.
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown product id, or a period with no sales (404)
    NotFound,
    /// Malformed entry, date or company info (400)
    ValidationError,
    /// Sales record id already stored (409)
    Conflict,
    /// Record store failed mid request (500)
    DatabaseError,
    /// settings.toml could not be written (500)
    SettingsError,
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::DatabaseError | ErrorCode::SettingsError | ErrorCode::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(what: &str, key: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{what} not found: {key}"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    fn store_failure(message: &str) -> Self {
        ApiError::new(ErrorCode::DatabaseError, message)
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::DuplicateId { id, .. } => {
                ApiError::new(ErrorCode::Conflict, format!("Sales record '{id}' is already stored"))
            }
            DbError::Unavailable(reason) => {
                tracing::error!(%reason, "Record store unavailable");
                ApiError::store_failure("Record store is unavailable")
            }
            DbError::CorruptRow { table, reason } => {
                tracing::error!(%table, %reason, "Stored row could not be read");
                ApiError::store_failure("Stored sales data is unreadable")
            }
            other @ (DbError::Migration(_) | DbError::Constraint(_) | DbError::Query(_)) => {
                tracing::error!(error = %other, "Record store operation failed");
                ApiError::store_failure("Record store operation failed")
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", id),
            CoreError::EmptyEntry => {
                ApiError::validation("少なくとも1つの商品の数量を入力してください")
            }
            CoreError::NoRecordsForPeriod(period) => {
                ApiError::new(ErrorCode::NotFound, format!("No sales recorded for {period}"))
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<SettingsError> for ApiError {
    fn from(err: SettingsError) -> Self {
        tracing::error!(error = %err, "Settings file update failed");
        ApiError::new(ErrorCode::SettingsError, "Settings could not be saved")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:?})", self.message, self.code)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================
