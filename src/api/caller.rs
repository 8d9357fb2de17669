//! Caller identity extractor.
//!
//! Every mutating call names the ledger account submitting it in the
//! `x-caller-id` header. The gateway does not authenticate the identity;
//! like a signed transaction's sender, it is taken as given and compared
//! by the contract.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::AccountId;
use crate::error::GatewayError;

/// Header carrying the caller's account UUID.
pub const CALLER_HEADER: &str = "x-caller-id";

/// Account submitting the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub AccountId);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(CALLER_HEADER)
            .ok_or_else(|| GatewayError::MissingCaller(format!("{CALLER_HEADER} header is required")))?
            .to_str()
            .map_err(|_| GatewayError::MissingCaller(format!("{CALLER_HEADER} is not valid ASCII")))?;
        raw.trim()
            .parse::<AccountId>()
            .map(Self)
            .map_err(|e| GatewayError::MissingCaller(format!("{CALLER_HEADER} '{raw}': {e}")))
    }
}
