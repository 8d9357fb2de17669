//! WebSocket message types: envelope, commands, and events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::PoolEvent;

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client broadcast event.
    Event,
    /// Server → Client error.
    Error,
}

impl WsMessage {
    /// Response to the command with `id`.
    #[must_use]
    pub fn response(id: String, payload: serde_json::Value) -> Self {
        Self {
            id,
            msg_type: WsMessageType::Response,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Error reply. `code` follows the REST error codes where one applies.
    #[must_use]
    pub fn error(id: String, code: u32, message: &str) -> Self {
        Self {
            id,
            msg_type: WsMessageType::Error,
            timestamp: Utc::now(),
            payload: serde_json::json!({ "code": code, "message": message }),
        }
    }

    /// Broadcast of a bus event.
    #[must_use]
    pub fn event(event: &PoolEvent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            msg_type: WsMessageType::Event,
            timestamp: event.timestamp(),
            payload: serde_json::to_value(event).unwrap_or_default(),
        }
    }

    /// Serializes the message to JSON text.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Commands that a client can send in the payload of a `command` message.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Subscribe to events for specific pools.
    Subscribe {
        /// Pool IDs to subscribe to. Use `["*"]` for all pools.
        pool_ids: Vec<String>,
        /// Event types to forward. Omitted or empty forwards all types.
        #[serde(default)]
        event_types: Vec<String>,
    },
    /// Unsubscribe from events for specific pools.
    Unsubscribe {
        /// Pool IDs to unsubscribe from. `"*"` drops the wildcard.
        pool_ids: Vec<String>,
    },
    /// Current entrant list of a pool (read-only).
    GetPlayers {
        /// Target pool ID.
        pool_id: String,
    },
    /// Full state of a pool (read-only).
    GetPool {
        /// Target pool ID.
        pool_id: String,
    },
}
