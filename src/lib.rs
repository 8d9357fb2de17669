//! # lottery-gateway
//!
//! Pooled-wager lottery contracts behind a REST API and WebSocket gateway.
//!
//! A [`domain::PoolContract`] collects stakes of at least the minimum from
//! any number of entrants, holds them in a custody account on the
//! [`domain::Ledger`], and lets only its operator draw a winner who receives
//! the whole pool. Every call either applies all of its effects or none.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)      x-caller-id → Caller
//!     ├── WS Handler (ws/)
//!     │
//!     ├── PoolService (service/)    pool lock → ledger lock
//!     ├── EventBus (domain/) ─────▶ PostgreSQL event log (persistence/)
//!     │
//!     ├── PoolRegistry (domain/)
//!     ├── PoolContract (domain/)
//!     └── InMemoryLedger + RandomnessProvider (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
