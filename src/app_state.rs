//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::GatewayConfig;
use crate::domain::{EventBus, InMemoryLedger, PoolRegistry};
use crate::persistence::PostgresPersistence;
use crate::service::PoolService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Pool service for all contract calls and ledger reads.
    pub pool_service: Arc<PoolService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
    /// Event log, present when persistence is enabled.
    pub event_log: Option<PostgresPersistence>,
}

impl AppState {
    /// Builds the state around `pool_service`, sharing its event bus.
    #[must_use]
    pub fn new(pool_service: Arc<PoolService>) -> Self {
        let event_bus = pool_service.event_bus().clone();
        Self {
            pool_service,
            event_bus,
            event_log: None,
        }
    }

    /// Attaches the event log read by the history endpoint.
    #[must_use]
    pub fn with_event_log(mut self, event_log: PostgresPersistence) -> Self {
        self.event_log = Some(event_log);
        self
    }

    /// Wires registry, ledger, randomness and event bus from `config`.
    #[must_use]
    pub fn from_config(config: &GatewayConfig) -> Self {
        let registry = Arc::new(PoolRegistry::new());
        let ledger = Arc::new(Mutex::new(InMemoryLedger::new(config.tx_fee_wei)));
        let event_bus = EventBus::new(config.event_bus_capacity);
        let pool_service = PoolService::new(
            registry,
            ledger,
            config.randomness.provider(),
            event_bus,
            config.min_stake_wei,
        );
        Self::new(Arc::new(pool_service))
    }
}
