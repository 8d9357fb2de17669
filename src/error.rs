//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Contract and
//! ledger failures are carried through unchanged and mapped to a specific
//! HTTP status code and structured JSON error response at the edge.

use std::error::Error as _;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ContractError, LedgerError};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 4001,
///     "message": "contract rejected the call: stake of 100 wei is below the minimum of 10000000000000000 wei",
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
    /// Numeric error code (see the table on [`GatewayError`]).
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
/// | Range     | Category            | HTTP Status                    |
/// |-----------|---------------------|--------------------------------|
/// | 1000–1999 | Validation / caller | 400 Bad Request / 401          |
/// | 2000–2999 | Not Found           | 404 Not Found                  |
/// | 3000–3999 | Server              | 500 / 503                      |
/// | 4000–4999 | Contract / ledger   | 403 / 409 / 422 / 502          |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Pool with the given ID was not found.
    #[error("pool not found: {0}")]
    PoolNotFound(uuid::Uuid),

    /// Account with the given ID was not found.
    #[error("account not found: {0}")]
    AccountNotFound(uuid::Uuid),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The call carried no usable caller identity.
    #[error("missing caller identity: {0}")]
    MissingCaller(String),

    /// The contract rejected the call.
    #[error("contract rejected the call: {0}")]
    Contract(#[from] ContractError),

    /// A ledger operation outside a contract call failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// The event log was queried while persistence is disabled.
    #[error("event log is disabled")]
    EventLogDisabled,

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
            Self::MissingCaller(_) => 1002,
            Self::PoolNotFound(_) => 2001,
            Self::AccountNotFound(_) => 2002,
            Self::Contract(err) => match err {
                ContractError::InsufficientStake { .. } => 4001,
                ContractError::Unauthorized { .. } => 4003,
                ContractError::NoEntrants => 4004,
                ContractError::CustodyEntry(_) => 4008,
                ContractError::StakeTransfer(inner) => ledger_code(inner),
                ContractError::PayoutTransfer(_) => 4005,
            },
            Self::Ledger(inner) => ledger_code(inner),
            Self::PersistenceError(_) => 3001,
            Self::EventLogDisabled => 3002,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::MissingCaller(_) => StatusCode::UNAUTHORIZED,
            Self::PoolNotFound(_) | Self::AccountNotFound(_) => StatusCode::NOT_FOUND,
            Self::Contract(err) => match err {
                ContractError::InsufficientStake { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ContractError::Unauthorized { .. } => StatusCode::FORBIDDEN,
                ContractError::NoEntrants => StatusCode::CONFLICT,
                ContractError::CustodyEntry(_) => StatusCode::FORBIDDEN,
                ContractError::StakeTransfer(inner) => ledger_status(inner),
                ContractError::PayoutTransfer(_) => StatusCode::BAD_GATEWAY,
            },
            Self::Ledger(inner) => ledger_status(inner),
            Self::EventLogDisabled => StatusCode::SERVICE_UNAVAILABLE,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

const fn ledger_code(err: &LedgerError) -> u32 {
    match err {
        LedgerError::UnknownAccount(_) => 2002,
        LedgerError::InsufficientFunds { .. } => 4002,
        LedgerError::PaymentRejected(_) => 4006,
        LedgerError::BalanceOverflow(_) => 4007,
        LedgerError::ContractSubmitter(_) => 4009,
    }
}

const fn ledger_status(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::UnknownAccount(_) => StatusCode::NOT_FOUND,
        LedgerError::ContractSubmitter(_) => StatusCode::FORBIDDEN,
        LedgerError::InsufficientFunds { .. }
        | LedgerError::PaymentRejected(_)
        | LedgerError::BalanceOverflow(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Host-level cause behind a contract transfer failure.
        let details = match &self {
            Self::Contract(err) => err.source().map(ToString::to_string),
            _ => None,
        };
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
