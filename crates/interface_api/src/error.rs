//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use domain_ledger::{LedgerError, RejectionKind};

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// HTTP status for a ledger rejection
pub fn status_for(kind: RejectionKind) -> StatusCode {
    match kind {
        RejectionKind::Unauthorized | RejectionKind::AlreadyBanned => StatusCode::FORBIDDEN,
        RejectionKind::InsufficientPayment => StatusCode::PAYMENT_REQUIRED,
        RejectionKind::PolicyLapsed
        | RejectionKind::NotInsured
        | RejectionKind::InsufficientPoolFunds
        | RejectionKind::ClaimCooldownActive => StatusCode::CONFLICT,
        RejectionKind::CoverageExceeded
        | RejectionKind::InvalidAmount
        | RejectionKind::Arithmetic => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", "Unauthorized".to_string()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::Ledger(err) => {
                let kind = err.kind();
                (status_for(kind), kind.code(), err.to_string())
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone()),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
