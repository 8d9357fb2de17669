//! Service layer: business logic orchestration.
//!
//! [`PoolService`] coordinates contract calls, runs them against the shared
//! ledger, and emits events through the [`super::domain::EventBus`].

pub mod pool_service;

pub use pool_service::PoolService;
