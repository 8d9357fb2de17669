//! lottery-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use lottery_gateway::api;
use lottery_gateway::app_state::AppState;
use lottery_gateway::config::{GatewayConfig, LogFormat};
use lottery_gateway::persistence::PostgresPersistence;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config =
        GatewayConfig::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    init_tracing(config.log_format);
    tracing::info!(
        addr = %config.listen_addr,
        min_stake_wei = config.min_stake_wei,
        tx_fee_wei = config.tx_fee_wei,
        randomness = ?config.randomness,
        "starting lottery-gateway"
    );

    // Build domain and service layers
    let mut app_state = AppState::from_config(&config);

    // Optional event log
    if config.persistence_enabled {
        let persistence = PostgresPersistence::connect(&config)
            .await
            .context("connecting to PostgreSQL")?;
        persistence
            .run_migrations()
            .await
            .context("running migrations")?;
        let _logger = persistence
            .clone()
            .spawn_event_logger(app_state.event_bus.subscribe());
        app_state = app_state.with_event_log(persistence);
        tracing::info!("event persistence enabled");
    }

    // Build router
    let app = api::build_app(app_state, Duration::from_secs(config.request_timeout_secs));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
