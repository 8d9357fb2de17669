//! DTOs for the persisted event history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::PoolId;
use crate::persistence::StoredEvent;

/// Query parameters for `GET /pools/{id}/events`.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventHistoryParams {
    /// Only return events committed strictly after this RFC 3339 instant.
    /// Defaults to the beginning of the log.
    #[serde(default)]
    pub after: Option<DateTime<Utc>>,
}

impl EventHistoryParams {
    /// Lower bound for the query.
    #[must_use]
    pub fn after_or_epoch(self) -> DateTime<Utc> {
        self.after.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// One logged event.
#[derive(Debug, Serialize, ToSchema)]
pub struct StoredEventDto {
    /// Log sequence number.
    pub id: i64,
    /// Event type discriminator.
    pub event_type: String,
    /// Full event as published on the bus.
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
    /// Commit time.
    pub occurred_at: DateTime<Utc>,
}

impl From<StoredEvent> for StoredEventDto {
    fn from(row: StoredEvent) -> Self {
        Self {
            id: row.id,
            event_type: row.event_type,
            payload: row.payload,
            occurred_at: row.occurred_at,
        }
    }
}

/// Response body for `GET /pools/{id}/events`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventHistoryResponse {
    /// Pool the history belongs to.
    pub pool_id: PoolId,
    /// Events in commit order.
    pub events: Vec<StoredEventDto>,
}
