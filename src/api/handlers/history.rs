//! Event history handler, backed by the PostgreSQL event log.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{EventHistoryParams, EventHistoryResponse, StoredEventDto};
use crate::app_state::AppState;
use crate::domain::PoolId;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /pools/{id}/events` — Logged events of one pool.
///
/// # Errors
///
/// Returns [`GatewayError::PoolNotFound`] for an unknown pool,
/// [`GatewayError::EventLogDisabled`] when persistence is off, or
/// [`GatewayError::PersistenceError`] if the query fails.
#[utoipa::path(
    get,
    path = "/api/v1/pools/{id}/events",
    tag = "Pools",
    summary = "Event history",
    description = "Returns the pool's logged events in commit order. Requires PERSISTENCE_ENABLED.",
    params(
        ("id" = uuid::Uuid, Path, description = "Pool UUID"),
        EventHistoryParams,
    ),
    responses(
        (status = 200, description = "Logged events", body = EventHistoryResponse),
        (status = 404, description = "Pool not found", body = ErrorResponse),
        (status = 503, description = "Event log disabled", body = ErrorResponse),
    )
)]
pub async fn get_pool_events(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Query(params): Query<EventHistoryParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let pool_id = PoolId::from_uuid(id);
    state.pool_service.pool_detail(pool_id).await?;
    let log = state
        .event_log
        .as_ref()
        .ok_or(GatewayError::EventLogDisabled)?;

    let events = log
        .load_events_after(params.after_or_epoch(), Some(id))
        .await?
        .into_iter()
        .map(StoredEventDto::from)
        .collect();
    Ok(Json(EventHistoryResponse { pool_id, events }))
}

/// History routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/pools/{id}/events", get(get_pool_events))
}
