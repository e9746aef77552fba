//! Exchange Error Types
//!
//! One taxonomy shared by the swap, redemption, item, and points paths.
//! Every variant maps to a numeric API error code and an HTTP status, so
//! handlers surface specific reasons without inventing their own mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::gateway::types::{ApiResponse, error_codes};

/// Exchange error taxonomy
#[derive(Error, Debug, Clone)]
pub enum ExchangeError {
    // === Resolution Errors ===
    #[error("{0} not found")]
    NotFound(&'static str),

    // === Role / Actor Errors ===
    #[error("{0}")]
    Unauthorized(String),

    // === State Machine Errors ===
    #[error("{0}")]
    InvalidState(String),

    #[error("You have already confirmed completion of this swap")]
    AlreadyCompleted,

    #[error("Item has been already redeemed")]
    AlreadyRedeemed,

    // === Ledger Errors ===
    #[error("User does not have sufficient points to redeem the item")]
    InsufficientBalance,

    // === Input Errors ===
    #[error("{0}")]
    Validation(String),

    #[error("User with this email already exists")]
    EmailTaken,

    // === System Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExchangeError {
    /// Numeric error code for API responses
    pub fn error_code(&self) -> i32 {
        match self {
            ExchangeError::NotFound(_) => error_codes::NOT_FOUND,
            ExchangeError::Unauthorized(_) => error_codes::FORBIDDEN,
            ExchangeError::InvalidState(_) => error_codes::INVALID_STATE,
            ExchangeError::AlreadyCompleted => error_codes::ALREADY_COMPLETED,
            ExchangeError::AlreadyRedeemed => error_codes::ALREADY_REDEEMED,
            ExchangeError::InsufficientBalance => error_codes::INSUFFICIENT_BALANCE,
            ExchangeError::Validation(_) => error_codes::INVALID_PARAMETER,
            ExchangeError::EmailTaken => error_codes::EMAIL_TAKEN,
            ExchangeError::Database(_) | ExchangeError::Internal(_) => error_codes::INTERNAL_ERROR,
        }
    }

    /// HTTP status for this error
    pub fn http_status(&self) -> StatusCode {
        match self {
            ExchangeError::NotFound(_) => StatusCode::NOT_FOUND,
            ExchangeError::Unauthorized(_) => StatusCode::FORBIDDEN,
            ExchangeError::InvalidState(_)
            | ExchangeError::AlreadyCompleted
            | ExchangeError::AlreadyRedeemed
            | ExchangeError::EmailTaken => StatusCode::CONFLICT,
            ExchangeError::InsufficientBalance => StatusCode::UNPROCESSABLE_ENTITY,
            ExchangeError::Validation(_) => StatusCode::BAD_REQUEST,
            ExchangeError::Database(_) | ExchangeError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Shorthand for actor-role failures
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ExchangeError::Unauthorized(msg.into())
    }

    /// Shorthand for transition-guard failures
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        ExchangeError::InvalidState(msg.into())
    }

    /// Shorthand for malformed input
    pub fn validation(msg: impl Into<String>) -> Self {
        ExchangeError::Validation(msg.into())
    }
}

impl From<sqlx::Error> for ExchangeError {
    fn from(e: sqlx::Error) -> Self {
        ExchangeError::Database(e.to_string())
    }
}

impl IntoResponse for ExchangeError {
    fn into_response(self) -> Response {
        if matches!(self, ExchangeError::Database(_) | ExchangeError::Internal(_)) {
            tracing::error!(error = %self, "Request failed with system error");
        }
        let body = ApiResponse::<()>::error(self.error_code(), self.to_string());
        (self.http_status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ExchangeError::AlreadyRedeemed.error_code(),
            error_codes::ALREADY_REDEEMED
        );
        assert_eq!(
            ExchangeError::InsufficientBalance.error_code(),
            error_codes::INSUFFICIENT_BALANCE
        );
        assert_eq!(
            ExchangeError::NotFound("Swap").error_code(),
            error_codes::NOT_FOUND
        );
    }

    #[test]
    fn test_http_status() {
        assert_eq!(
            ExchangeError::NotFound("Item").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ExchangeError::unauthorized("nope").http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ExchangeError::AlreadyCompleted.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ExchangeError::InsufficientBalance.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ExchangeError::Internal("boom".into()).http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ExchangeError::NotFound("Swap").to_string(), "Swap not found");
        assert_eq!(
            ExchangeError::AlreadyRedeemed.to_string(),
            "Item has been already redeemed"
        );
        assert_eq!(
            ExchangeError::invalid_state("This swap is already accepted").to_string(),
            "This swap is already accepted"
        );
    }
}
