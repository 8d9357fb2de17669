//! Pool-related DTOs for create, get, and list operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::{PaginationMeta, PaginationParams};
use crate::domain::pool_entry::{PoolDetail, PoolSummary};
use crate::domain::{AccountId, DrawOutcome, PoolId};

/// Request body for `POST /pools`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreatePoolRequest {
    /// Optional human-readable name (max 100 chars).
    #[serde(default)]
    pub name: Option<String>,
}

/// Response body for `POST /pools` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatePoolResponse {
    /// Unique pool identifier.
    pub pool_id: PoolId,
    /// Pool name echoed from request.
    pub name: Option<String>,
    /// The creating caller, the only account allowed to draw.
    pub operator: AccountId,
    /// Custody account holding the pooled stakes.
    pub contract_account: AccountId,
    /// Minimum stake per entry in wei.
    pub min_stake: String,
    /// Server creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Single pool detail for `GET /pools/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolDetailResponse {
    /// Pool identifier.
    pub pool_id: PoolId,
    /// Optional label.
    pub name: Option<String>,
    /// Operator account.
    pub operator: AccountId,
    /// Custody account.
    pub contract_account: AccountId,
    /// Minimum stake per entry in wei.
    pub min_stake: String,
    /// Current pool balance in wei.
    pub balance: String,
    /// Entrants of the current round, in entry order.
    pub players: Vec<AccountId>,
    /// Completed draws.
    pub round: u64,
    /// Most recent draw, if any.
    pub last_draw: Option<DrawOutcome>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Entries accepted over the pool's lifetime.
    pub total_entries: u64,
    /// Wei paid out over the pool's lifetime.
    pub total_paid_out: String,
}

impl From<PoolDetail> for PoolDetailResponse {
    fn from(d: PoolDetail) -> Self {
        Self {
            pool_id: d.pool_id,
            name: d.name,
            operator: d.operator,
            contract_account: d.contract_account,
            min_stake: d.min_stake.to_string(),
            balance: d.balance.to_string(),
            players: d.players,
            round: d.round,
            last_draw: d.last_draw,
            created_at: d.created_at,
            updated_at: d.last_modified_at,
            total_entries: d.total_entries,
            total_paid_out: d.total_paid_out.to_string(),
        }
    }
}

/// Pool summary for list responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolSummaryDto {
    /// Pool identifier.
    pub pool_id: PoolId,
    /// Optional label.
    pub name: Option<String>,
    /// Operator account.
    pub operator: AccountId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Entries in the current round.
    pub entrant_count: usize,
    /// Current pool balance in wei.
    pub balance: String,
    /// Completed draws.
    pub round: u64,
}

impl From<PoolSummary> for PoolSummaryDto {
    fn from(s: PoolSummary) -> Self {
        Self {
            pool_id: s.pool_id,
            name: s.name,
            operator: s.operator,
            created_at: s.created_at,
            entrant_count: s.entrant_count,
            balance: s.balance.to_string(),
            round: s.round,
        }
    }
}

/// Query parameters for `GET /pools`.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PoolListParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default)]
    pub page: Option<u32>,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default)]
    pub per_page: Option<u32>,
    /// Only list pools operated by this account.
    #[serde(default)]
    #[param(value_type = Option<String>, format = Uuid)]
    pub operator: Option<AccountId>,
}

impl PoolListParams {
    /// Pagination part of the query, with defaults applied.
    #[must_use]
    pub fn pagination(&self) -> PaginationParams {
        let defaults = PaginationParams::default();
        PaginationParams {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// Paginated list response for `GET /pools`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolListResponse {
    /// Pool summaries.
    pub data: Vec<PoolSummaryDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
