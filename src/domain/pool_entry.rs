//! Pool entry combining a lottery contract with server-side metadata.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{AccountId, DrawOutcome, PoolContract, PoolId};

/// Aggregate wrapping a [`PoolContract`] with gateway metadata.
///
/// Each pool in the registry is stored as a `PoolEntry`. The `contract`
/// field holds the live round state while the remaining fields track
/// operational metadata.
#[derive(Debug)]
pub struct PoolEntry {
    /// Unique pool identifier (immutable after creation).
    pub pool_id: PoolId,

    /// The contract instance. Updated on enter / draw.
    pub contract: PoolContract,

    /// Optional human-readable label.
    pub name: Option<String>,

    /// Creation timestamp (immutable after creation).
    pub created_at: DateTime<Utc>,

    /// Timestamp of last state mutation.
    pub last_modified_at: DateTime<Utc>,

    /// Entries accepted over the pool's lifetime, across rounds.
    pub total_entries: u64,

    /// Wei paid out to winners over the pool's lifetime.
    pub total_paid_out: u128,
}

impl PoolEntry {
    /// Creates a new `PoolEntry` around a freshly deployed contract.
    #[must_use]
    pub fn new(pool_id: PoolId, contract: PoolContract, name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            pool_id,
            contract,
            name,
            created_at: now,
            last_modified_at: now,
            total_entries: 0,
            total_paid_out: 0,
        }
    }
}

/// Lightweight summary of a pool for list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct PoolSummary {
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
    pub balance: u128,
    /// Completed draws.
    pub round: u64,
}

impl From<&PoolEntry> for PoolSummary {
    fn from(entry: &PoolEntry) -> Self {
        Self {
            pool_id: entry.pool_id,
            name: entry.name.clone(),
            operator: entry.contract.operator(),
            created_at: entry.created_at,
            entrant_count: entry.contract.entrant_count(),
            balance: entry.contract.balance(),
            round: entry.contract.round(),
        }
    }
}

/// Full view of one pool, taken under its read lock.
#[derive(Debug, Clone)]
pub struct PoolDetail {
    /// Pool identifier.
    pub pool_id: PoolId,
    /// Optional label.
    pub name: Option<String>,
    /// Operator account.
    pub operator: AccountId,
    /// Custody account holding the pooled stakes.
    pub contract_account: AccountId,
    /// Minimum stake per entry in wei.
    pub min_stake: u128,
    /// Current pool balance in wei.
    pub balance: u128,
    /// Entrants of the current round, in entry order.
    pub players: Vec<AccountId>,
    /// Completed draws.
    pub round: u64,
    /// Most recent draw, if any.
    pub last_draw: Option<DrawOutcome>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of last state mutation.
    pub last_modified_at: DateTime<Utc>,
    /// Entries accepted over the pool's lifetime.
    pub total_entries: u64,
    /// Wei paid out over the pool's lifetime.
    pub total_paid_out: u128,
}

impl From<&PoolEntry> for PoolDetail {
    fn from(entry: &PoolEntry) -> Self {
        let contract = &entry.contract;
        Self {
            pool_id: entry.pool_id,
            name: entry.name.clone(),
            operator: contract.operator(),
            contract_account: contract.custody_account(),
            min_stake: contract.min_stake(),
            balance: contract.balance(),
            players: contract.get_all_players().to_vec(),
            round: contract.round(),
            last_draw: contract.last_draw().copied(),
            created_at: entry.created_at,
            last_modified_at: entry.last_modified_at,
            total_entries: entry.total_entries,
            total_paid_out: entry.total_paid_out,
        }
    }
}
