use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use kolo_core::envelope;

/// Bank service error variants. Each maps to a legacy wire code, a status
/// label, and an HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum BankServiceError {
    #[error("one or more fields failed validation")]
    Validation(BTreeMap<String, String>),
    #[error("the request is malformed")]
    BadRequest(String),
    #[error("the requested record could not be found")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
    #[error("invalid credentials")]
    AuthenticationError,
    #[error("invalid or missing authentication token")]
    InvalidToken,
    #[error("the authentication token has expired")]
    ExpiredToken,
    #[error("a transaction PIN has not been set for this account")]
    TransactionPinNotSet,
    #[error("the transfer PIN is invalid")]
    InvalidTransferPin,
    #[error("the senders account number is not authorized")]
    UnauthorizedAccountNo,
    #[error("transfer amount exceeds the single transaction limit")]
    SingleLimitExceeded,
    #[error("transfer amount exceeds the daily transaction limit")]
    DailyLimitExceeded,
    #[error("the upstream payment request failed")]
    GatewayFailure(String),
    #[error("the server encountered a problem and could not process the request")]
    Internal(#[from] anyhow::Error),
}

impl BankServiceError {
    /// Legacy numeric-string error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "10",
            Self::NotFound => "25",
            Self::Conflict(_) => "23",
            Self::GatewayFailure(_) => "26",
            Self::TransactionPinNotSet => "27",
            Self::BadRequest(_) => "35",
            Self::Internal(_) => "40",
            Self::AuthenticationError => "60",
            Self::ExpiredToken => "62",
            Self::InvalidToken => "63",
            Self::SingleLimitExceeded => "110",
            Self::DailyLimitExceeded => "111",
            Self::InvalidTransferPin => "112",
            Self::UnauthorizedAccountNo => "113",
        }
    }

    /// Legacy status label carried in the envelope's `status` field.
    pub fn status_label(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::NotFound => "RecordNotFound",
            Self::Conflict(_) => "DataIntegrityViolation",
            Self::GatewayFailure(_) => "FailedApiResponse",
            Self::TransactionPinNotSet => "TransactionPINNotSet",
            Self::BadRequest(_) => "BadRequest",
            Self::Internal(_) => "ServerError",
            Self::AuthenticationError => "AuthenticationError",
            Self::ExpiredToken => "ExpiredToken",
            Self::InvalidToken => "InvalidToken",
            Self::SingleLimitExceeded => "TransferSingleLimitExceeded",
            Self::DailyLimitExceeded => "TransferDailyLimitExceeded",
            Self::InvalidTransferPin => "InvalidTransferPIN",
            Self::UnauthorizedAccountNo => "UnauthorizedAccountNo",
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::GatewayFailure(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::AuthenticationError | Self::ExpiredToken | Self::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::TransactionPinNotSet
            | Self::InvalidTransferPin
            | Self::UnauthorizedAccountNo
            | Self::SingleLimitExceeded
            | Self::DailyLimitExceeded => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for BankServiceError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = %e, code = self.code(), "internal error");
            }
            Self::GatewayFailure(cause) => {
                tracing::error!(cause = %cause, code = self.code(), "payment gateway failure");
            }
            _ => {}
        }

        let message = self.to_string();
        let detail = match &self {
            Self::Validation(fields) => serde_json::json!(fields),
            Self::Conflict(detail) | Self::BadRequest(detail) => serde_json::json!(detail),
            _ => serde_json::json!(message),
        };
        let body = envelope::error(self.code(), self.status_label(), &message, detail);
        (self.http_status(), axum::Json(body)).into_response()
    }
}
