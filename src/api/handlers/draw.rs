//! Draw handler: `pickWinner`.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::caller::Caller;
use crate::api::dto::PickWinnerResponse;
use crate::app_state::AppState;
use crate::domain::PoolId;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /pools/{id}/pick-winner` — Draw a winner and pay out the pool.
///
/// # Errors
///
/// Returns [`GatewayError`] if the caller is not the operator, the pool is
/// empty, or the payout transfer fails.
#[utoipa::path(
    post,
    path = "/api/v1/pools/{id}/pick-winner",
    tag = "Lottery",
    summary = "Pick a winner",
    description = "Operator only. Selects one entry, transfers the entire pool balance to it, and resets the entrant list for the next round.",
    params(
        ("id" = uuid::Uuid, Path, description = "Pool UUID"),
        ("x-caller-id" = uuid::Uuid, Header, description = "Calling account"),
    ),
    responses(
        (status = 200, description = "Winner paid", body = PickWinnerResponse),
        (status = 401, description = "Missing caller", body = ErrorResponse),
        (status = 403, description = "Caller is not the operator", body = ErrorResponse),
        (status = 404, description = "Pool not found", body = ErrorResponse),
        (status = 409, description = "No entrants", body = ErrorResponse),
        (status = 502, description = "Payout transfer failed", body = ErrorResponse),
    )
)]
pub async fn pick_winner(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Caller(caller): Caller,
) -> Result<impl IntoResponse, GatewayError> {
    let pool_id = PoolId::from_uuid(id);
    let outcome = state.pool_service.pick_winner(pool_id, caller).await?;
    Ok(Json(PickWinnerResponse { pool_id, outcome }))
}

/// Draw routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/pools/{id}/pick-winner", post(pick_winner))
}
