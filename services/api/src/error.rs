//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and how each
//! variant is rendered as an HTTP response.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use booking_core::ports::PortError;
use serde_json::json;
use tracing::error;

use crate::config::ConfigError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from the core rules or the store port.
    #[error("{0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The request carries no valid credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// The caller is authenticated but not allowed to do this.
    #[error("{0}")]
    Forbidden(String),

    /// The request body or query failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Port(port) => match port {
                PortError::NotFound(_) => StatusCode::NOT_FOUND,
                PortError::BadRequest(_) => StatusCode::BAD_REQUEST,
                PortError::Forbidden(_) => StatusCode::FORBIDDEN,
                PortError::Conflict(_) => StatusCode::CONFLICT,
                PortError::Unauthorized => StatusCode::UNAUTHORIZED,
                PortError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Config(_)
            | ApiError::Database(_)
            | ApiError::Io(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Extractor failures are client errors unless axum itself reports a server fault.
fn rejected(status: StatusCode, body_text: String) -> ApiError {
    if status.is_server_error() {
        ApiError::Internal(body_text)
    } else {
        ApiError::BadRequest(body_text)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        rejected(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        rejected(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        rejected(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = json!({
            "statusCode": status.as_u16(),
            "message": message,
        });
        (status, Json(body)).into_response()
    }
}
