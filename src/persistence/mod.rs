//! Persistence layer: PostgreSQL event log.
//!
//! When enabled, every [`crate::domain::PoolEvent`] published on the bus is
//! appended to the `lottery_events` table by a background task. Storage
//! failures are logged and never fail a contract call. The concrete
//! implementation uses `sqlx::PgPool` for async PostgreSQL access.

pub mod models;
pub mod postgres;

pub use models::{EventRecord, StoredEvent};
pub use postgres::PostgresPersistence;
