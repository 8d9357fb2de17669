//! Per-connection subscription manager.
//!
//! Tracks which pools and event types a WebSocket client follows and
//! filters bus events server-side.

use std::collections::HashSet;

use crate::domain::PoolId;
use crate::domain::pool_event::{EVENT_TYPES, PoolEvent};

/// One entry of a subscribe or unsubscribe request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolSelector {
    /// Every pool (`"*"`).
    All,
    /// A single pool.
    Pool(PoolId),
}

/// Parses raw pool selectors, returning the valid ones and the rejected
/// inputs.
#[must_use]
pub fn parse_selectors(raw: &[String]) -> (Vec<PoolSelector>, Vec<String>) {
    let mut selectors = Vec::with_capacity(raw.len());
    let mut rejected = Vec::new();
    for item in raw {
        let item = item.trim();
        if item == "*" {
            selectors.push(PoolSelector::All);
        } else if let Ok(uuid) = item.parse::<uuid::Uuid>() {
            selectors.push(PoolSelector::Pool(PoolId::from_uuid(uuid)));
        } else {
            rejected.push(item.to_string());
        }
    }
    (selectors, rejected)
}

/// Manages the subscriptions of a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed pool IDs. Ignored while `subscribe_all` is set.
    pool_ids: HashSet<PoolId>,
    /// Whether the client follows all pools (wildcard `"*"`).
    subscribe_all: bool,
    /// Event types to forward. Empty forwards every type.
    event_types: HashSet<&'static str>,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the selected pools.
    pub fn subscribe(&mut self, selectors: &[PoolSelector]) {
        for selector in selectors {
            match selector {
                PoolSelector::All => self.subscribe_all = true,
                PoolSelector::Pool(id) => {
                    self.pool_ids.insert(*id);
                }
            }
        }
    }

    /// Removes the selected pools. `"*"` turns the wildcard off but keeps
    /// explicit pool subscriptions.
    pub fn unsubscribe(&mut self, selectors: &[PoolSelector]) {
        for selector in selectors {
            match selector {
                PoolSelector::All => self.subscribe_all = false,
                PoolSelector::Pool(id) => {
                    self.pool_ids.remove(id);
                }
            }
        }
    }

    /// Restricts forwarded events to `types`. An empty slice forwards all.
    ///
    /// # Errors
    ///
    /// Returns the first unknown event type; the filter is left unchanged.
    pub fn set_event_types(&mut self, types: &[String]) -> Result<(), String> {
        let mut filter = HashSet::with_capacity(types.len());
        for name in types {
            let known = EVENT_TYPES
                .iter()
                .find(|t| **t == name.as_str())
                .ok_or_else(|| name.clone())?;
            filter.insert(*known);
        }
        self.event_types = filter;
        Ok(())
    }

    /// Returns `true` if `event` passes both the pool and the type filter.
    #[must_use]
    pub fn matches(&self, event: &PoolEvent) -> bool {
        let pool_ok = self.subscribe_all || self.pool_ids.contains(&event.pool_id());
        pool_ok
            && (self.event_types.is_empty() || self.event_types.contains(event.event_type_str()))
    }

    /// Returns the number of explicitly subscribed pool IDs.
    #[must_use]
    pub fn count(&self) -> usize {
        self.pool_ids.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }

    /// Event types currently forwarded, sorted. Empty means all.
    #[must_use]
    pub fn event_types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.event_types.iter().copied().collect();
        types.sort_unstable();
        types
    }
}
