//! PostgreSQL implementation of the event log.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::models::{EventRecord, StoredEvent};
use crate::config::GatewayConfig;
use crate::domain::PoolEvent;
use crate::error::GatewayError;

/// PostgreSQL-backed event log using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    /// Creates a new persistence layer with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if the database cannot
    /// be reached.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if a migration fails.
    pub async fn run_migrations(&self) -> Result<(), GatewayError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))
    }

    /// Appends an event to the event log.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on serialization or
    /// database failure.
    pub async fn save_event(&self, event: &PoolEvent) -> Result<i64, GatewayError> {
        let record = EventRecord::from_event(event)
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        let row = sqlx::query_scalar::<_, i64>(
            "INSERT INTO lottery_events (pool_id, event_type, payload, occurred_at) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(record.pool_id)
        .bind(record.event_type)
        .bind(&record.payload)
        .bind(record.occurred_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(row)
    }

    /// Loads events after the given timestamp, optionally filtered by pool ID.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn load_events_after(
        &self,
        after: DateTime<Utc>,
        pool_id: Option<Uuid>,
    ) -> Result<Vec<StoredEvent>, GatewayError> {
        let rows = if let Some(pid) = pool_id {
            sqlx::query_as::<_, (i64, Uuid, String, serde_json::Value, DateTime<Utc>)>(
                "SELECT id, pool_id, event_type, payload, occurred_at FROM lottery_events \
                 WHERE occurred_at > $1 AND pool_id = $2 ORDER BY occurred_at ASC, id ASC",
            )
            .bind(after)
            .bind(pid)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, (i64, Uuid, String, serde_json::Value, DateTime<Utc>)>(
                "SELECT id, pool_id, event_type, payload, occurred_at FROM lottery_events \
                 WHERE occurred_at > $1 ORDER BY occurred_at ASC, id ASC",
            )
            .bind(after)
            .fetch_all(&self.pool)
            .await
        }
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(
                |(id, pool_id, event_type, payload, occurred_at)| StoredEvent {
                    id,
                    pool_id,
                    event_type,
                    payload,
                    occurred_at,
                },
            )
            .collect())
    }

    /// Spawns a task that appends every event from `event_rx` to the log
    /// until the bus closes.
    #[must_use]
    pub fn spawn_event_logger(self, mut event_rx: broadcast::Receiver<PoolEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match event_rx.recv().await {
                    Ok(event) => {
                        if let Err(err) = self.save_event(&event).await {
                            tracing::warn!(
                                pool_id = %event.pool_id(),
                                event_type = event.event_type_str(),
                                error = %err,
                                "failed to persist event"
                            );
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "event logger lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            tracing::debug!("event logger stopped");
        })
    }
}
