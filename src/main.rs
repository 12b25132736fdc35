//! bracket-gateway server entry point.
//!
//! Starts the Axum HTTP server with the REST endpoints.

use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use bracket_gateway::api;
use bracket_gateway::app_state::AppState;
use bracket_gateway::config::{LogFormat, ServiceConfig};
use bracket_gateway::persistence::{InMemoryMatchStore, MatchRepository, PostgresMatchStore};
use bracket_gateway::service::MatchService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ServiceConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::info!(addr = %config.listen_addr, "starting bracket-gateway");

    // Build persistence layer
    let repository = if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(config.database_connect_timeout())
            .connect(&config.database_url)
            .await
            .context("failed to connect to PostgreSQL")?;
        let store = PostgresMatchStore::new(pool);
        if config.run_migrations {
            store.migrate().await.context("failed to run migrations")?;
        }
        tracing::info!("using PostgreSQL match store");
        MatchRepository::Postgres(store)
    } else {
        tracing::warn!("persistence disabled; matches are kept in memory only");
        MatchRepository::Memory(InMemoryMatchStore::new())
    };

    // Build service layer
    let match_service = Arc::new(MatchService::new(
        Arc::new(repository),
        config.guard_advancement_slots,
    ));

    // Build router
    let app = api::build_app(AppState { match_service }, config.request_timeout());

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
