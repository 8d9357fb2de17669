//! Pool handlers: deploy, list, get.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::caller::Caller;
use crate::api::dto::{
    CreatePoolRequest, CreatePoolResponse, PoolDetailResponse, PoolListParams, PoolListResponse,
    PoolSummaryDto,
};
use crate::app_state::AppState;
use crate::domain::PoolId;
use crate::error::{ErrorResponse, GatewayError};

const MAX_NAME_LEN: usize = 100;

/// `POST /pools` — Deploy a new lottery pool.
///
/// # Errors
///
/// Returns [`GatewayError`] on a missing caller, a malformed body or
/// over-long name, or a caller that cannot pay the call fee. The body may
/// be omitted.
#[utoipa::path(
    post,
    path = "/api/v1/pools",
    tag = "Pools",
    summary = "Deploy a lottery pool",
    description = "Constructs a new pool contract. The caller becomes its operator, the only account allowed to pick a winner.",
    params(
        ("x-caller-id" = uuid::Uuid, Header, description = "Calling account"),
    ),
    request_body = CreatePoolRequest,
    responses(
        (status = 201, description = "Pool deployed", body = CreatePoolResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing caller", body = ErrorResponse),
        (status = 404, description = "Caller account not found", body = ErrorResponse),
        (status = 422, description = "Caller cannot pay the fee", body = ErrorResponse),
    )
)]
pub async fn create_pool(
    State(state): State<AppState>,
    Caller(caller): Caller,
    body: Bytes,
) -> Result<impl IntoResponse, GatewayError> {
    let req = if body.is_empty() {
        CreatePoolRequest::default()
    } else {
        serde_json::from_slice::<CreatePoolRequest>(&body)
            .map_err(|e| GatewayError::InvalidRequest(format!("invalid body: {e}")))?
    };
    if let Some(name) = &req.name
        && name.chars().count() > MAX_NAME_LEN
    {
        return Err(GatewayError::InvalidRequest(format!(
            "name exceeds {MAX_NAME_LEN} characters"
        )));
    }

    let pool_id = state.pool_service.create_pool(caller, req.name).await?;
    let detail = state.pool_service.pool_detail(pool_id).await?;

    let response = CreatePoolResponse {
        pool_id,
        name: detail.name,
        operator: detail.operator,
        contract_account: detail.contract_account,
        min_stake: detail.min_stake.to_string(),
        created_at: detail.created_at,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /pools` — List pools with pagination and optional operator filter.
///
/// # Errors
///
/// Returns [`GatewayError`] on internal failures.
#[utoipa::path(
    get,
    path = "/api/v1/pools",
    tag = "Pools",
    summary = "List pools",
    description = "Returns a paginated list of pools, oldest first, optionally filtered by operator.",
    params(PoolListParams),
    responses(
        (status = 200, description = "Paginated pool list", body = PoolListResponse),
    )
)]
pub async fn list_pools(
    State(state): State<AppState>,
    Query(params): Query<PoolListParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let summaries = state.pool_service.list_pools(params.operator).await;
    let (page, pagination) = params.pagination().paginate(summaries);
    let data = page.into_iter().map(PoolSummaryDto::from).collect();

    Ok(Json(PoolListResponse { data, pagination }))
}

/// `GET /pools/{id}` — Get pool details.
///
/// # Errors
///
/// Returns [`GatewayError::PoolNotFound`] if the pool does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/pools/{id}",
    tag = "Pools",
    summary = "Get pool details",
    description = "Returns operator, balance, current entrants, round counter and the last draw.",
    params(
        ("id" = uuid::Uuid, Path, description = "Pool UUID"),
    ),
    responses(
        (status = 200, description = "Pool details", body = PoolDetailResponse),
        (status = 404, description = "Pool not found", body = ErrorResponse),
    )
)]
pub async fn get_pool(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let detail = state.pool_service.pool_detail(PoolId::from_uuid(id)).await?;
    Ok(Json(PoolDetailResponse::from(detail)))
}

/// Pool management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pools", post(create_pool).get(list_pools))
        .route("/pools/{id}", get(get_pool))
}
