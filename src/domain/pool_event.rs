//! Domain events reflecting pool state mutations.
//!
//! Every committed contract call emits a [`PoolEvent`] through the
//! [`super::EventBus`]. Events are broadcast to WebSocket subscribers and
//! optionally persisted to the PostgreSQL event log.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{AccountId, PoolId};

/// Wire names of every [`PoolEvent`] variant.
pub const EVENT_TYPES: [&str; 3] = ["pool_created", "player_entered", "winner_picked"];

/// Domain event emitted after every committed state mutation.
///
/// Wei amounts are stored as `String` to preserve u128 precision when
/// serialized to JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PoolEvent {
    /// Emitted when a pool contract is deployed.
    PoolCreated {
        /// Pool identifier.
        pool_id: PoolId,
        /// Deploying account, the only one allowed to draw.
        operator: AccountId,
        /// Ledger account holding the pooled stakes.
        contract_account: AccountId,
        /// Minimum stake per entry (wei).
        min_stake: String,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a successful entry.
    PlayerEntered {
        /// Pool identifier.
        pool_id: PoolId,
        /// Account that entered.
        player: AccountId,
        /// Stake received (wei).
        stake: String,
        /// Entrant count after the entry.
        entrant_count: usize,
        /// Pool balance after the entry (wei).
        pool_balance: String,
        /// Block height the entry was committed in.
        block_height: u64,
        /// Entry timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a winner has been paid and the round reset.
    WinnerPicked {
        /// Pool identifier.
        pool_id: PoolId,
        /// Round that was closed.
        round: u64,
        /// Account that received the pool.
        winner: AccountId,
        /// Amount paid out (wei).
        prize: String,
        /// Number of entries drawn from.
        entrant_count: usize,
        /// Block height the draw was committed in.
        block_height: u64,
        /// Draw timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl PoolEvent {
    /// Returns the pool ID associated with this event.
    #[must_use]
    pub fn pool_id(&self) -> PoolId {
        match self {
            Self::PoolCreated { pool_id, .. }
            | Self::PlayerEntered { pool_id, .. }
            | Self::WinnerPicked { pool_id, .. } => *pool_id,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::PoolCreated { .. } => "pool_created",
            Self::PlayerEntered { .. } => "player_entered",
            Self::WinnerPicked { .. } => "winner_picked",
        }
    }

    /// Returns the event timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::PoolCreated { timestamp, .. }
            | Self::PlayerEntered { timestamp, .. }
            | Self::WinnerPicked { timestamp, .. } => *timestamp,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn pool_created_event_type() {
        let event = PoolEvent::PoolCreated {
            pool_id: PoolId::new(),
            operator: AccountId::new(),
            contract_account: AccountId::new(),
            min_stake: "10000000000000000".to_string(),
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_type_str(), "pool_created");
    }

    #[test]
    fn winner_picked_serializes_with_tag() {
        let winner = AccountId::new();
        let event = PoolEvent::WinnerPicked {
            pool_id: PoolId::new(),
            round: 3,
            winner,
            prize: "4000000000000000000".to_string(),
            entrant_count: 2,
            block_height: 9,
            timestamp: Utc::now(),
        };
        let Ok(json) = serde_json::to_value(&event) else {
            panic!("serialization failed");
        };
        assert_eq!(json["event_type"], "winner_picked");
        assert_eq!(json["prize"], "4000000000000000000");
        assert_eq!(json["winner"], winner.to_string());
        assert_eq!(json["round"], 3);
    }

    #[test]
    fn event_types_cover_every_variant() {
        let event = PoolEvent::PoolCreated {
            pool_id: PoolId::new(),
            operator: AccountId::new(),
            contract_account: AccountId::new(),
            min_stake: "1".to_string(),
            timestamp: Utc::now(),
        };
        assert!(EVENT_TYPES.contains(&event.event_type_str()));
        assert_eq!(EVENT_TYPES.len(), 3);
    }

    #[test]
    fn pool_id_accessor() {
        let id = PoolId::new();
        let event = PoolEvent::PlayerEntered {
            pool_id: id,
            player: AccountId::new(),
            stake: "1".to_string(),
            entrant_count: 1,
            pool_balance: "1".to_string(),
            block_height: 1,
            timestamp: Utc::now(),
        };
        assert_eq!(event.pool_id(), id);
        assert_eq!(event.event_type_str(), "player_entered");
    }
}
