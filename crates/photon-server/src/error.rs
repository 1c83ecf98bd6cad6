//! Error types for the façade.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Façade error type.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The vendor session is no longer accepted (vendor 401).
    #[error("Vendor authentication required: {0}")]
    VendorAuth(String),

    /// The vendor rate-limited us (vendor 429, token already revoked).
    #[error("Vendor rate limit exceeded")]
    RateLimited,

    /// Any other upstream failure (vendor 5xx, transport, upload).
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Requested generation is not cached.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed inbound request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Cache/storage failure.
    #[error("Storage error: {0}")]
    Storage(#[from] photon_store::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<photon_client::Error> for ServerError {
    fn from(e: photon_client::Error) -> Self {
        match e {
            photon_client::Error::AuthRequired => ServerError::VendorAuth(e.to_string()),
            photon_client::Error::RateLimited => ServerError::RateLimited,
            other => ServerError::Upstream(other.to_string()),
        }
    }
}

/// Result type for façade operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ServerError::VendorAuth(_) => (StatusCode::UNAUTHORIZED, "vendor_auth_required"),
            ServerError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
            ServerError::Upstream(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ServerError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
            ServerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let message = self.to_string();

        match &self {
            ServerError::Internal(_) | ServerError::Storage(_) => {
                tracing::error!(status = %status, code, error = %message, "Server error");
            }
            _ => {
                tracing::warn!(status = %status, code, error = %message, "Request failed");
            }
        }

        let body = ErrorResponse {
            code: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
