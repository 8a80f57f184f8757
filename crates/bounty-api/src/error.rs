//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps ledger errors to HTTP status codes and returns JSON bodies carrying
//! the ledger's stable error code. Internal error details are logged and
//! never returned to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bounty_ledger::LedgerError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "DEADLINE_PASSED", "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// A ledger operation was rejected.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Request body or query could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Request parsed but failed validation (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Caller identity missing or malformed (401).
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Resource not found outside the ledger (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Ledger(err) => {
                let status = match err {
                    LedgerError::InvalidDeposit { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    LedgerError::SelfFulfillmentForbidden { .. }
                    | LedgerError::Unauthorized { .. } => StatusCode::FORBIDDEN,
                    LedgerError::DeadlinePassed { .. } | LedgerError::InvalidState { .. } => {
                        StatusCode::CONFLICT
                    }
                    LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
                    LedgerError::TransferFailed { .. } => StatusCode::FAILED_DEPENDENCY,
                    LedgerError::BalanceOverflow { .. } | LedgerError::EscrowMismatch { .. } => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.code())
            }
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::Unauthenticated(_) => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = if status.is_server_error() {
            tracing::error!(error = %self, code, "internal server error");
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<bounty_core::ValidationError> for AppError {
    fn from(err: bounty_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}
