//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "vaccine not found: 5f0c...",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                    |
/// |-----------|-----------------|--------------------------------|
/// | 1000–1999 | Validation      | 400 / 401 / 403 / 409          |
/// | 2000–2999 | State/Not Found | 404 Not Found / 409 Conflict   |
/// | 3000–3999 | Server/Upstream | 500 / 502                      |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Vaccine record with the given ID was not found for the caller.
    #[error("vaccine not found: {0}")]
    VaccineNotFound(uuid::Uuid),

    /// No baby profile exists for the owner.
    #[error("profile not found for owner {0}")]
    ProfileNotFound(uuid::Uuid),

    /// No deliverable contact address exists for the owner.
    #[error("contact address not found for owner {0}")]
    ContactNotFound(uuid::Uuid),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The requested status change is not allowed.
    #[error("invalid status transition: {0}")]
    InvalidTransition(String),

    /// Caller identity is missing or malformed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is identified but not allowed to perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A reminder scan is already running in this process.
    #[error("a reminder scan is already in progress")]
    ScanInProgress,

    /// The notification relay rejected or failed to deliver a message.
    #[error("notification delivery failed: {0}")]
    DeliveryFailure(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidTransition(_) => 1002,
            Self::Unauthorized(_) => 1003,
            Self::Forbidden(_) => 1004,
            Self::VaccineNotFound(_) => 2001,
            Self::ProfileNotFound(_) => 2002,
            Self::ContactNotFound(_) => 2003,
            Self::ScanInProgress => 2004,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
            Self::DeliveryFailure(_) => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::InvalidTransition(_) | Self::ScanInProgress => StatusCode::CONFLICT,
            Self::VaccineNotFound(_) | Self::ProfileNotFound(_) | Self::ContactNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::DeliveryFailure(_) => StatusCode::BAD_GATEWAY,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        Self::PersistenceError(err.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
