//! Application error taxonomy and HTTP mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::utils::validation::FieldError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

/// Errors surfaced to API callers.
///
/// Cache tier failures deliberately have no variant here: they are never
/// fatal to a request and stay inside the cache layer as
/// [`crate::infrastructure::cache::CacheError`].
#[derive(Debug)]
pub enum AppError {
    /// Malformed input; `details` carries the field-level error list.
    Validation { message: String, details: Value },
    /// Slug absent or expired.
    NotFound { message: String, details: Value },
    /// Slug already taken.
    Conflict { message: String, details: Value },
    /// Store operation failed.
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    /// Builds a validation error from the structured field error list, so
    /// callers can surface every problem at once.
    pub fn validation_failed(errors: Vec<FieldError>) -> Self {
        Self::Validation {
            message: "Validation failed".to_string(),
            details: json!({ "errors": errors }),
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Validation { message, .. } => write!(f, "validation error: {}", message),
            AppError::NotFound { message, .. } => write!(f, "not found: {}", message),
            AppError::Conflict { message, .. } => write!(f, "conflict: {}", message),
            AppError::Internal { message, .. } => write!(f, "internal error: {}", message),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                details,
            ),
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            AppError::Conflict { message, details } => {
                (StatusCode::CONFLICT, "conflict", message, details)
            }
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    /// Unique violations become [`AppError::Conflict`] so a racing duplicate
    /// create surfaces as "slug exists"; everything else is internal.
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Slug already exists",
                json!({ "constraint": db.constraint() }),
            );
        }

        tracing::error!(error = %e, "database error");
        AppError::internal("Database error", json!({}))
    }
}
