//! Account DTOs for opening and inspecting development accounts.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::AccountId;

/// Request body for `POST /accounts`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    /// Opening balance in wei, or `"<n> ether"`. Defaults to zero.
    #[serde(default)]
    pub initial_balance: Option<String>,
}

/// Account balance view, returned by `POST /accounts` and
/// `GET /accounts/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountResponse {
    /// Account identifier, used as `x-caller-id`.
    pub account_id: AccountId,
    /// Balance in wei.
    pub balance: String,
    /// Balance formatted in ether.
    pub balance_ether: String,
}
