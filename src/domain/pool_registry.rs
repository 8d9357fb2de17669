//! Concurrent pool storage with per-pool fine-grained locking.
//!
//! [`PoolRegistry`] stores all deployed pools in a `HashMap` where each
//! entry is individually protected by a [`tokio::sync::RwLock`]. Calls
//! against the same pool are serialized by its write lock, giving the total
//! order a ledger would impose on one contract; different pools proceed
//! concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockWriteGuard};

use super::pool_entry::{PoolEntry, PoolSummary};
use super::{AccountId, PoolContract, PoolId};
use crate::error::GatewayError;

type PoolMap = HashMap<PoolId, Arc<RwLock<PoolEntry>>>;

/// Central store for all deployed lottery pools.
///
/// Uses a `RwLock<HashMap<...>>` for the outer map and per-entry
/// `Arc<RwLock<PoolEntry>>` for fine-grained per-pool locking.
///
/// # Concurrency
///
/// - Multiple readers may observe the same pool concurrently.
/// - Writes to different pools are concurrent.
/// - Writes to the same pool are serialized.
#[derive(Debug)]
pub struct PoolRegistry {
    pools: RwLock<PoolMap>,
}

/// Reserved, not yet visible registry slot returned by
/// [`PoolRegistry::reserve`].
#[derive(Debug)]
pub struct PoolSlot<'a> {
    map: RwLockWriteGuard<'a, PoolMap>,
    pool_id: PoolId,
}

impl PoolSlot<'_> {
    /// ID the pool will be registered under.
    #[must_use]
    pub const fn pool_id(&self) -> PoolId {
        self.pool_id
    }

    /// Registers the pool and releases the registry.
    pub fn fill(mut self, contract: PoolContract, name: Option<String>) -> PoolId {
        let entry = PoolEntry::new(self.pool_id, contract, name);
        self.map.insert(self.pool_id, Arc::new(RwLock::new(entry)));
        self.pool_id
    }
}

impl PoolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pools: RwLock::new(HashMap::new()),
        }
    }

    /// Locks the registry for deploying one pool and picks an unused ID.
    ///
    /// The map stays write-locked until the returned slot is filled or
    /// dropped, so filling it cannot fail.
    pub async fn reserve(&self) -> PoolSlot<'_> {
        let map = self.pools.write().await;
        let mut pool_id = PoolId::new();
        while map.contains_key(&pool_id) {
            pool_id = PoolId::new();
        }
        PoolSlot { map, pool_id }
    }

    /// Returns the pool entry behind its per-pool lock.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PoolNotFound`] if no pool with the given ID
    /// exists.
    pub async fn get(&self, pool_id: PoolId) -> Result<Arc<RwLock<PoolEntry>>, GatewayError> {
        let map = self.pools.read().await;
        map.get(&pool_id)
            .cloned()
            .ok_or(GatewayError::PoolNotFound(*pool_id.as_uuid()))
    }

    /// Returns summaries of all pools, optionally filtered by operator,
    /// oldest first.
    pub async fn list(&self, operator_filter: Option<AccountId>) -> Vec<PoolSummary> {
        let map = self.pools.read().await;
        let mut summaries = Vec::with_capacity(map.len());
        for entry_lock in map.values() {
            let entry = entry_lock.read().await;
            if let Some(operator) = operator_filter
                && entry.contract.operator() != operator
            {
                continue;
            }
            summaries.push(PoolSummary::from(&*entry));
        }
        summaries.sort_by_key(|s| (s.created_at, *s.pool_id.as_uuid()));
        summaries
    }

    /// Returns the number of pools in the registry.
    pub async fn len(&self) -> usize {
        self.pools.read().await.len()
    }

    /// Returns `true` if the registry contains no pools.
    pub async fn is_empty(&self) -> bool {
        self.pools.read().await.is_empty()
    }
}

impl Default for PoolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
