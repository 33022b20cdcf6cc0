use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Result type alias for ClinicHub operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// A single field-level validation failure, reported with enough detail for
/// the caller to fix the request.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Outcome taxonomy for every service operation. Each variant carries a
/// stable machine-readable kind plus a human-readable message; internal
/// details are logged, never serialized.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or missing required input
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Uniqueness violation (duplicate clinic name, duplicate user email)
    #[error("{0}")]
    Conflict(String),

    /// Referenced entity absent
    #[error("{0}")]
    NotFound(String),

    /// Missing, invalid, or expired credential
    #[error("{0}")]
    Unauthorized(String),

    /// Valid credential, insufficient role or not the resource owner
    #[error("{0}")]
    Forbidden(String),

    /// Storage failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unexpected condition outside the storage layer
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation(errors)
    }

    /// Single-field validation failure
    pub fn invalid<F: ToString, M: ToString>(field: F, message: M) -> Self {
        Self::Validation(vec![FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }])
    }

    pub fn conflict<T: ToString>(message: T) -> Self {
        Self::Conflict(message.to_string())
    }

    pub fn not_found<T: ToString>(message: T) -> Self {
        Self::NotFound(message.to_string())
    }

    pub fn unauthorized<T: ToString>(message: T) -> Self {
        Self::Unauthorized(message.to_string())
    }

    pub fn forbidden<T: ToString>(message: T) -> Self {
        Self::Forbidden(message.to_string())
    }

    pub fn internal<T: ToString>(message: T) -> Self {
        Self::Internal(message.to_string())
    }

    /// Stable machine-readable kind for clients
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::Conflict(_) => "CONFLICT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Database(_) | Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::Internal(format!("password hashing failed: {err}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({
                    "success": false,
                    "code": self.kind(),
                    "message": "Validation failed",
                    "errors": errors,
                }),
            ),
            ApiError::Conflict(message) => (
                StatusCode::CONFLICT,
                serde_json::json!({ "success": false, "code": self.kind(), "message": message }),
            ),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "success": false, "code": self.kind(), "message": message }),
            ),
            ApiError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({ "success": false, "code": self.kind(), "message": message }),
            ),
            ApiError::Forbidden(message) => (
                StatusCode::FORBIDDEN,
                serde_json::json!({ "success": false, "code": self.kind(), "message": message }),
            ),
            ApiError::Database(err) => {
                error!("Storage failure: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "success": false, "code": self.kind(), "message": "Server error" }),
                )
            }
            ApiError::Internal(message) => {
                error!("Internal error: {message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "success": false, "code": self.kind(), "message": "Server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
