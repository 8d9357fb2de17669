//! DTOs for entering a pool, listing players and drawing a winner.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AccountId, DrawOutcome, EntryReceipt, PoolId};

/// Request body for `POST /pools/{id}/enter`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EnterRequest {
    /// Stake attached to the call, in wei or `"<n> ether"`.
    pub value: String,
}

/// Response body for a successful entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct EnterResponse {
    /// Pool entered.
    pub pool_id: PoolId,
    /// Account that entered.
    pub player: AccountId,
    /// Stake received in wei.
    pub stake: String,
    /// Entrant count after this entry.
    pub entrant_count: usize,
    /// Pool balance after this entry in wei.
    pub pool_balance: String,
}

impl EnterResponse {
    /// Builds the response for `pool_id` from a contract receipt.
    #[must_use]
    pub fn new(pool_id: PoolId, receipt: &EntryReceipt) -> Self {
        Self {
            pool_id,
            player: receipt.player,
            stake: receipt.stake.to_string(),
            entrant_count: receipt.entrant_count,
            pool_balance: receipt.pool_balance.to_string(),
        }
    }
}

/// Response body for `GET /pools/{id}/players`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayersResponse {
    /// Pool queried.
    pub pool_id: PoolId,
    /// Entrants of the current round, in entry order. Repeat entries appear
    /// once per entry.
    pub players: Vec<AccountId>,
}

/// Response body for `POST /pools/{id}/pick-winner`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PickWinnerResponse {
    /// Pool drawn.
    pub pool_id: PoolId,
    /// Draw result.
    #[serde(flatten)]
    pub outcome: DrawOutcome,
}
