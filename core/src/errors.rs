use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use token_ledger::TokenError;

use crate::submitter::SubmitError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Internal server error")]
    Internal(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Rejected by ledger: {0}")]
    Rejected(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Internal(_) => "INTERNAL_SERVER_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Rejected(_) => "LEDGER_REJECTED",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(detail = %detail, "request failed");
        }

        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.error_type().to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        if err.is_rule_violation() {
            return Self::Rejected(err.to_string());
        }
        match err {
            TokenError::UnauthorizedMinter { .. } => Self::Forbidden(err.to_string()),
            _ => Self::BadRequest(err.to_string()),
        }
    }
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Ledger(e) => e.into(),
            SubmitError::Encoding(e) => Self::Internal(format!("transaction encoding: {e}")),
            SubmitError::Signing(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::SignerError;
    use token_ledger::{Address, U256};

    #[test]
    fn test_token_errors_map_to_status() {
        let invalid: AppError = TokenError::InvalidAddress("0x123".into()).into();
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let short: AppError = TokenError::InsufficientBalance {
            account: Address::ZERO,
            balance: U256::ZERO,
            needed: U256::from(1u64),
        }
        .into();
        assert_eq!(short.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(short.error_type(), "LEDGER_REJECTED");

        let minter: AppError = TokenError::UnauthorizedMinter {
            minter: Address::ZERO,
        }
        .into();
        assert_eq!(minter.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_every_rule_violation_is_rejected() {
        let violations = [
            TokenError::InsufficientBalance {
                account: Address::ZERO,
                balance: U256::ZERO,
                needed: U256::from(1u64),
            },
            TokenError::InsufficientAllowance {
                owner: Address::ZERO,
                spender: Address::ZERO,
                allowance: U256::ZERO,
                needed: U256::from(1u64),
            },
            TokenError::SupplyOverflow,
        ];
        for err in violations {
            assert!(err.is_rule_violation());
            let app: AppError = err.into();
            assert_eq!(app.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        }

        let amount: AppError = TokenError::InvalidAmount("-1".into()).into();
        assert_eq!(amount.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_signing_failure_is_internal() {
        let err: AppError = SubmitError::Signing(SignerError::Signing("boom".into())).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let err = AppError::Internal("secret detail".into());
        assert_eq!(err.to_string(), "Internal server error");
    }
}
