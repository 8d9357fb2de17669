//! Development account handlers: open a funded account, read a balance.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{AccountResponse, CreateAccountRequest, parse_wei};
use crate::app_state::AppState;
use crate::domain::AccountId;
use crate::domain::units::format_ether;
use crate::error::{ErrorResponse, GatewayError};

fn account_response(account_id: AccountId, balance: u128) -> AccountResponse {
    AccountResponse {
        account_id,
        balance: balance.to_string(),
        balance_ether: format_ether(balance),
    }
}

/// `POST /accounts` — Open a funded development account.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] if the balance cannot be parsed.
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    tag = "Accounts",
    summary = "Open a development account",
    description = "Opens a ledger account pre-funded with `initial_balance` wei, the way a local development node hands out funded accounts.",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account opened", body = AccountResponse),
        (status = 400, description = "Invalid balance", body = ErrorResponse),
    )
)]
pub async fn create_account(
    State(state): State<AppState>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let initial_balance = match req.initial_balance.as_deref() {
        Some(raw) => parse_wei("initial_balance", raw)?,
        None => 0,
    };
    let account_id = state.pool_service.open_account(initial_balance).await;
    Ok((
        StatusCode::CREATED,
        Json(account_response(account_id, initial_balance)),
    ))
}

/// `GET /accounts/{id}` — Read an account balance.
///
/// # Errors
///
/// Returns [`GatewayError::AccountNotFound`] if the account does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{id}",
    tag = "Accounts",
    summary = "Get account balance",
    params(
        ("id" = uuid::Uuid, Path, description = "Account UUID"),
    ),
    responses(
        (status = 200, description = "Account balance", body = AccountResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
    )
)]
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let account_id = AccountId::from_uuid(id);
    let balance = state.pool_service.account_balance(account_id).await?;
    Ok(Json(account_response(account_id, balance)))
}

/// Account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(create_account))
        .route("/accounts/{id}", get(get_account))
}
