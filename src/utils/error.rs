//! Error types and handling
//!
//! All errors are converted to a consistent JSON response format. The
//! operations layer raises typed errors; handlers map them to HTTP statuses
//! and never swallow them.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad or missing input caught before touching storage (422)
    #[error("Validation error: {0}")]
    Validation(String),

    /// SQL execution or constraint failure (500)
    #[error("Database error: {0}")]
    Database(String),

    /// Directory create/move/open failure (500)
    #[error("Filesystem error: {0}")]
    Filesystem(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource already exists or state conflict (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn filesystem(msg: impl Into<String>) -> Self {
        Self::Filesystem(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Error response body
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, should_log) = match &self {
            AppError::Validation(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", false)
            }
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error", true),
            AppError::Filesystem(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "filesystem_error", true)
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", false),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request", false),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict", false),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", true),
        };

        // Log server errors
        if should_log {
            error!(error = %self, error_type = error_type, "Request error");
        }

        let body = ErrorResponse::new(error_type, self.to_string());

        (status, Json(body)).into_response()
    }
}

// Implement From for common error types

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        // Repositories wrap sqlx errors with anyhow context; keep the
        // constraint classification when the chain bottoms out in sqlx.
        for cause in err.chain() {
            if let Some(sqlx_err) = cause.downcast_ref::<sqlx::Error>() {
                if matches!(sqlx_err, sqlx::Error::RowNotFound) {
                    return AppError::NotFound("Record not found".to_string());
                }
                return classify_sqlx_message(&sqlx_err.to_string(), format!("{:#}", err));
            }
        }
        AppError::Database(format!("{:#}", err))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".to_string()),
            other => {
                let message = other.to_string();
                classify_sqlx_message(&message, message.clone())
            }
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Filesystem(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Turn a unique-constraint violation into a conflict naming the offending
/// column, anything else into a database error.
fn classify_sqlx_message(sqlx_message: &str, fallback: String) -> AppError {
    if let Some(idx) = sqlx_message.find("UNIQUE constraint failed:") {
        let column = sqlx_message[idx + "UNIQUE constraint failed:".len()..]
            .trim()
            .trim_end_matches(')');
        AppError::Conflict(format!("Duplicate value for unique column {}", column))
    } else {
        AppError::Database(fallback)
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;
