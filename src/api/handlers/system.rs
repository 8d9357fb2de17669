//! System endpoints: health check and lottery configuration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::units::format_ether;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Lottery parameters applied to new pools and calls.
#[derive(Debug, Serialize, ToSchema)]
pub struct LotteryConfigResponse {
    min_stake: String,
    min_stake_ether: String,
    tx_fee: String,
    randomness: String,
}

/// `GET /config/lottery` — Current lottery parameters.
#[utoipa::path(
    get,
    path = "/config/lottery",
    tag = "System",
    summary = "Lottery parameters",
    description = "Returns the minimum stake for new pools, the flat per-call fee, and the winner selection source.",
    responses(
        (status = 200, description = "Lottery parameters", body = LotteryConfigResponse),
    )
)]
pub async fn lottery_config_handler(State(state): State<AppState>) -> impl IntoResponse {
    let service = &state.pool_service;
    let min_stake = service.min_stake();
    Json(LotteryConfigResponse {
        min_stake: min_stake.to_string(),
        min_stake_ether: format_ether(min_stake),
        tx_fee: service.tx_fee().await.to_string(),
        randomness: service.randomness_mode(),
    })
}

/// Chain-level ledger counters.
#[derive(Debug, Serialize, ToSchema)]
pub struct LedgerStatusResponse {
    block_height: u64,
    block_hash: String,
    block_timestamp: String,
    accounts: usize,
    contract_accounts: usize,
    tx_fee: String,
    total_fees_burned: String,
}

/// `GET /ledger` — Latest block and fee totals.
#[utoipa::path(
    get,
    path = "/ledger",
    tag = "System",
    summary = "Ledger status",
    description = "Returns the latest sealed block, the number of opened accounts, and the fees burned so far.",
    responses(
        (status = 200, description = "Ledger status", body = LedgerStatusResponse),
    )
)]
pub async fn ledger_status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.pool_service.ledger_status().await;
    Json(LedgerStatusResponse {
        block_height: status.latest_block.height,
        block_hash: status.latest_block.hash_hex(),
        block_timestamp: status.latest_block.timestamp.to_rfc3339(),
        accounts: status.accounts,
        contract_accounts: status.contract_accounts,
        tx_fee: status.tx_fee.to_string(),
        total_fees_burned: status.total_fees_burned.to_string(),
    })
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/lottery", get(lottery_config_handler))
        .route("/ledger", get(ledger_status_handler))
}
