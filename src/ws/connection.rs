//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding filtered events.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::{SubscriptionManager, parse_selectors};
use crate::api::dto::PoolDetailResponse;
use crate::domain::{PoolEvent, PoolId};
use crate::error::GatewayError;
use crate::service::PoolService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards matching events from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<PoolEvent>,
    pool_service: Arc<PoolService>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(&text, &mut subs, &pool_service).await;
                        if ws_tx.send(Message::text(reply.to_json())).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(pool_event) => {
                        if subs.matches(&pool_event) {
                            let json = WsMessage::event(&pool_event).to_json();
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Handles one text frame from the client and returns the reply.
pub async fn handle_text_message(
    text: &str,
    subs: &mut SubscriptionManager,
    pool_service: &PoolService,
) -> WsMessage {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return WsMessage::error(String::new(), 1001, "malformed JSON");
    };
    if msg.msg_type != WsMessageType::Command {
        return WsMessage::error(msg.id, 1001, "expected a command message");
    }
    let command = match serde_json::from_value::<WsCommand>(msg.payload) {
        Ok(command) => command,
        Err(e) => return WsMessage::error(msg.id, 1001, &format!("unknown command: {e}")),
    };

    match dispatch(command, subs, pool_service).await {
        Ok(payload) => WsMessage::response(msg.id, payload),
        Err(err) => WsMessage::error(msg.id, err.error_code(), &err.to_string()),
    }
}

async fn dispatch(
    command: WsCommand,
    subs: &mut SubscriptionManager,
    pool_service: &PoolService,
) -> Result<serde_json::Value, GatewayError> {
    match command {
        WsCommand::Subscribe {
            pool_ids,
            event_types,
        } => {
            let (selectors, rejected) = parse_selectors(&pool_ids);
            subs.set_event_types(&event_types)
                .map_err(|t| GatewayError::InvalidRequest(format!("unknown event type: {t}")))?;
            subs.subscribe(&selectors);
            Ok(serde_json::json!({
                "count": subs.count(),
                "wildcard": subs.is_subscribed_all(),
                "event_types": subs.event_types(),
                "rejected": rejected,
            }))
        }
        WsCommand::Unsubscribe { pool_ids } => {
            let (selectors, rejected) = parse_selectors(&pool_ids);
            subs.unsubscribe(&selectors);
            Ok(serde_json::json!({
                "remaining_count": subs.count(),
                "wildcard": subs.is_subscribed_all(),
                "rejected": rejected,
            }))
        }
        WsCommand::GetPlayers { pool_id } => {
            let pool_id = parse_pool_id(&pool_id)?;
            let players = pool_service.get_all_players(pool_id).await?;
            Ok(serde_json::json!({ "pool_id": pool_id, "players": players }))
        }
        WsCommand::GetPool { pool_id } => {
            let pool_id = parse_pool_id(&pool_id)?;
            let detail = pool_service.pool_detail(pool_id).await?;
            serde_json::to_value(PoolDetailResponse::from(detail))
                .map_err(|e| GatewayError::Internal(e.to_string()))
        }
    }
}

fn parse_pool_id(raw: &str) -> Result<PoolId, GatewayError> {
    raw.trim()
        .parse::<uuid::Uuid>()
        .map(PoolId::from_uuid)
        .map_err(|e| GatewayError::InvalidRequest(format!("invalid pool_id '{raw}': {e}")))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use tokio::sync::Mutex;

    use super::*;
    use crate::domain::units::{MIN_STAKE_WEI, WEI_PER_ETHER};
    use crate::domain::{EventBus, FixedIndex, InMemoryLedger, PoolRegistry};

    fn make_service() -> PoolService {
        PoolService::new(
            Arc::new(PoolRegistry::new()),
            Arc::new(Mutex::new(InMemoryLedger::default())),
            Arc::new(FixedIndex(0)),
            EventBus::new(64),
            MIN_STAKE_WEI,
        )
    }

    fn command(id: &str, payload: serde_json::Value) -> String {
        serde_json::json!({
            "id": id,
            "type": "command",
            "timestamp": chrono::Utc::now(),
            "payload": payload,
        })
        .to_string()
    }

    #[tokio::test]
    async fn malformed_json_yields_error() {
        let service = make_service();
        let mut subs = SubscriptionManager::new();
        let reply = handle_text_message("{not json", &mut subs, &service).await;
        assert_eq!(reply.msg_type, WsMessageType::Error);
    }

    #[tokio::test]
    async fn subscribe_wildcard_is_acknowledged() {
        let service = make_service();
        let mut subs = SubscriptionManager::new();
        let text = command(
            "1",
            serde_json::json!({ "command": "subscribe", "pool_ids": ["*", "bogus"] }),
        );
        let reply = handle_text_message(&text, &mut subs, &service).await;
        assert_eq!(reply.msg_type, WsMessageType::Response);
        assert_eq!(reply.id, "1");
        assert_eq!(reply.payload["wildcard"], true);
        assert_eq!(reply.payload["rejected"][0], "bogus");
        assert!(subs.is_subscribed_all());
    }

    #[tokio::test]
    async fn get_players_returns_entrants() {
        let service = make_service();
        let operator = service.open_account(WEI_PER_ETHER).await;
        let player = service.open_account(WEI_PER_ETHER).await;
        let Ok(pool_id) = service.create_pool(operator, None).await else {
            panic!("pool creation failed");
        };
        let Ok(_) = service.enter(pool_id, player, MIN_STAKE_WEI).await else {
            panic!("entry failed");
        };

        let mut subs = SubscriptionManager::new();
        let text = command(
            "2",
            serde_json::json!({ "command": "get_players", "pool_id": pool_id.to_string() }),
        );
        let reply = handle_text_message(&text, &mut subs, &service).await;
        assert_eq!(reply.msg_type, WsMessageType::Response);
        assert_eq!(reply.payload["players"][0], player.to_string());
    }

    #[tokio::test]
    async fn unknown_pool_maps_to_not_found_code() {
        let service = make_service();
        let mut subs = SubscriptionManager::new();
        let text = command(
            "3",
            serde_json::json!({ "command": "get_pool", "pool_id": PoolId::new().to_string() }),
        );
        let reply = handle_text_message(&text, &mut subs, &service).await;
        assert_eq!(reply.msg_type, WsMessageType::Error);
        assert_eq!(reply.payload["code"], 2001);
    }

    #[tokio::test]
    async fn unknown_command_is_rejected() {
        let service = make_service();
        let mut subs = SubscriptionManager::new();
        let text = command("4", serde_json::json!({ "command": "transfer" }));
        let reply = handle_text_message(&text, &mut subs, &service).await;
        assert_eq!(reply.msg_type, WsMessageType::Error);
        assert_eq!(reply.payload["code"], 1001);
    }
}
