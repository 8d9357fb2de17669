//! Entry handlers: `enter` and `getAllPlayers`.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::caller::Caller;
use crate::api::dto::{EnterRequest, EnterResponse, PlayersResponse, parse_wei};
use crate::app_state::AppState;
use crate::domain::PoolId;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /pools/{id}/enter` — Enter the current round.
///
/// # Errors
///
/// Returns [`GatewayError`] on a missing caller, a malformed value, an
/// unknown pool, a stake below the minimum, or insufficient funds.
#[utoipa::path(
    post,
    path = "/api/v1/pools/{id}/enter",
    tag = "Lottery",
    summary = "Enter a pool",
    description = "Transfers `value` wei from the caller into pool custody and appends the caller to the entrant list. The same account may enter repeatedly.",
    params(
        ("id" = uuid::Uuid, Path, description = "Pool UUID"),
        ("x-caller-id" = uuid::Uuid, Header, description = "Calling account"),
    ),
    request_body = EnterRequest,
    responses(
        (status = 200, description = "Entry accepted", body = EnterResponse),
        (status = 400, description = "Malformed value", body = ErrorResponse),
        (status = 401, description = "Missing caller", body = ErrorResponse),
        (status = 404, description = "Pool or caller not found", body = ErrorResponse),
        (status = 422, description = "Stake below minimum or insufficient funds", body = ErrorResponse),
    )
)]
pub async fn enter(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Caller(caller): Caller,
    Json(req): Json<EnterRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let pool_id = PoolId::from_uuid(id);
    let value = parse_wei("value", &req.value)?;
    let receipt = state.pool_service.enter(pool_id, caller, value).await?;
    Ok(Json(EnterResponse::new(pool_id, &receipt)))
}

/// `GET /pools/{id}/players` — List entrants of the current round.
///
/// # Errors
///
/// Returns [`GatewayError::PoolNotFound`] if the pool does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/pools/{id}/players",
    tag = "Lottery",
    summary = "Get all players",
    description = "Returns the entrant list of the current round in entry order. Empty right after a draw.",
    params(
        ("id" = uuid::Uuid, Path, description = "Pool UUID"),
    ),
    responses(
        (status = 200, description = "Entrant list", body = PlayersResponse),
        (status = 404, description = "Pool not found", body = ErrorResponse),
    )
)]
pub async fn get_players(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let pool_id = PoolId::from_uuid(id);
    let players = state.pool_service.get_all_players(pool_id).await?;
    Ok(Json(PlayersResponse { pool_id, players }))
}

/// Entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pools/{id}/enter", post(enter))
        .route("/pools/{id}/players", get(get_players))
}
