//! Error handling module
//!
//! Provides unified error types and handling for the entire application.
//! Every failure kind is propagated through `Result` and translated to an
//! HTTP status and response envelope only at the axum boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::ApiResponse;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Stable machine-readable code carried in the response envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Pool(_) => "POOL_EXHAUSTED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Constraint(_) => "CONSTRAINT_VIOLATION",
            AppError::Unauthorized(_) => "INVALID_CREDENTIALS",
            AppError::Internal(_) => "INTERNAL_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// HTTP status for each error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Pool(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Constraint(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                format!("A database error occurred: {}", e)
            }
            AppError::Pool(e) => {
                error!("Pool error: {:?}", e);
                "Database connection pool exhausted".to_string()
            }
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                msg.clone()
            }
            AppError::Config(msg) => {
                error!("Configuration error: {}", msg);
                msg.clone()
            }
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Constraint(msg)
            | AppError::Unauthorized(msg) => msg.clone(),
        };

        let body = Json(ApiResponse::<()>::failure(self.code(), message));

        (self.status(), body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

/// Helper function to create a validation error
pub fn validation_error(msg: impl Into<String>) -> AppError {
    AppError::Validation(msg.into())
}

/// Helper function to create a not found error
pub fn not_found_error(msg: impl Into<String>) -> AppError {
    AppError::NotFound(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_per_kind() {
        assert_eq!(
            AppError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Constraint("x".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Unauthorized("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_code_per_kind() {
        assert_eq!(AppError::NotFound("x".into()).code(), "NOT_FOUND");
        assert_eq!(
            AppError::Constraint("x".into()).code(),
            "CONSTRAINT_VIOLATION"
        );
        assert_eq!(
            AppError::Unauthorized("x".into()).code(),
            "INVALID_CREDENTIALS"
        );
    }
}
