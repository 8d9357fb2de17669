//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use crate::api::dto::{
    AccountResponse, CreateAccountRequest, CreatePoolRequest, CreatePoolResponse, EnterRequest,
    EnterResponse, EventHistoryResponse, PaginationMeta, PickWinnerResponse, PlayersResponse, PoolDetailResponse,
    PoolListResponse, PoolSummaryDto, StoredEventDto,
};
use crate::api::handlers::{account, draw, entry, history, pool, system};
use crate::domain::{AccountId, DrawOutcome, PoolId};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI specification, served at `/api-docs/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "lottery-gateway",
        description = "Pooled-wager lottery contracts over REST and WebSocket. Amounts are decimal strings of wei."
    ),
    paths(
        system::health_handler,
        system::lottery_config_handler,
        system::ledger_status_handler,
        account::create_account,
        account::get_account,
        pool::create_pool,
        pool::list_pools,
        pool::get_pool,
        entry::enter,
        entry::get_players,
        draw::pick_winner,
        history::get_pool_events,
    ),
    components(schemas(
        AccountId,
        PoolId,
        DrawOutcome,
        CreateAccountRequest,
        AccountResponse,
        CreatePoolRequest,
        CreatePoolResponse,
        PoolDetailResponse,
        PoolSummaryDto,
        PoolListResponse,
        PaginationMeta,
        EnterRequest,
        EnterResponse,
        PlayersResponse,
        PickWinnerResponse,
        EventHistoryResponse,
        StoredEventDto,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "System", description = "Health and configuration"),
        (name = "Accounts", description = "Development ledger accounts"),
        (name = "Pools", description = "Pool deployment and inspection"),
        (name = "Lottery", description = "enter, getAllPlayers, pickWinner"),
    )
)]
pub struct ApiDoc;
