//! Server bootstrap: open the store, build the router, listen.

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::api::{self, AppState};
use crate::config::ServerConfig;
use crate::db::GameRepository;
use crate::store::GameStore;

/// Opens the database, applies migrations and returns a ready store.
///
/// # Errors
///
/// Fails if the database cannot be opened or migrated.
#[instrument(skip(config), fields(database_url = %config.database_url()))]
pub fn open_store(config: &ServerConfig) -> Result<GameStore> {
    let repository = GameRepository::new(config.database_url().clone())?;
    repository
        .run_migrations()
        .context("Failed to prepare database")?;
    Ok(GameStore::new(repository))
}

/// Runs the HTTP API until Ctrl+C.
///
/// # Errors
///
/// Fails if the store cannot be opened or the address cannot be bound.
#[instrument(skip(config), fields(host = %config.host(), port = config.port()))]
pub async fn serve(config: ServerConfig) -> Result<()> {
    let store = open_store(&config)?;
    let app = api::router(AppState::new(store), config.allowed_origins());

    let address = (config.host().as_str(), *config.port());
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host(), config.port()))?;

    info!(
        address = %listener.local_addr()?,
        origins = ?config.allowed_origins(),
        "API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}
