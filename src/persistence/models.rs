//! Database models for the event log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::PoolEvent;

/// A stored row from the `lottery_events` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Auto-increment row ID.
    pub id: i64,
    /// Pool that generated the event.
    pub pool_id: Uuid,
    /// Event type discriminator (e.g. `"winner_picked"`).
    pub event_type: String,
    /// JSONB payload with the full serialized event.
    pub payload: serde_json::Value,
    /// When the call was committed.
    pub occurred_at: DateTime<Utc>,
}

/// Row to insert, derived from a bus event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Pool that generated the event.
    pub pool_id: Uuid,
    /// Event type discriminator.
    pub event_type: &'static str,
    /// Serialized event.
    pub payload: serde_json::Value,
    /// Event timestamp.
    pub occurred_at: DateTime<Utc>,
}

impl EventRecord {
    /// Builds the row for `event`.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if the event cannot be encoded as JSON.
    pub fn from_event(event: &PoolEvent) -> Result<Self, serde_json::Error> {
        Ok(Self {
            pool_id: *event.pool_id().as_uuid(),
            event_type: event.event_type_str(),
            payload: serde_json::to_value(event)?,
            occurred_at: event.timestamp(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, PoolId};

    #[test]
    fn record_carries_event_fields() {
        let pool_id = PoolId::new();
        let player = AccountId::new();
        let event = PoolEvent::PlayerEntered {
            pool_id,
            player,
            stake: "20000000000000000".to_string(),
            entrant_count: 2,
            pool_balance: "40000000000000000".to_string(),
            block_height: 5,
            timestamp: Utc::now(),
        };
        let Ok(record) = EventRecord::from_event(&event) else {
            panic!("event should serialize");
        };
        assert_eq!(record.pool_id, *pool_id.as_uuid());
        assert_eq!(record.event_type, "player_entered");
        assert_eq!(record.occurred_at, event.timestamp());
        assert_eq!(record.payload["player"], player.to_string());
        assert_eq!(record.payload["stake"], "20000000000000000");
    }

    #[test]
    fn winner_record_keeps_pool_and_prize() {
        let pool_id = PoolId::new();
        let winner = AccountId::new();
        let event = PoolEvent::WinnerPicked {
            pool_id,
            round: 2,
            winner,
            prize: "60000000000000000".to_string(),
            entrant_count: 3,
            block_height: 11,
            timestamp: Utc::now(),
        };
        let Ok(record) = EventRecord::from_event(&event) else {
            panic!("event should serialize");
        };
        assert_eq!(record.pool_id, *pool_id.as_uuid());
        assert_eq!(record.event_type, "winner_picked");
        assert_eq!(record.payload["event_type"], "winner_picked");
        assert_eq!(record.payload["winner"], winner.to_string());
        assert_eq!(record.payload["prize"], "60000000000000000");
        assert_eq!(record.payload["block_height"], 11);
    }
}
