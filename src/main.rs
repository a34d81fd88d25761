use dotenv::dotenv;
use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;

mod config;
mod error;
mod logging;
mod models;
mod repositories;
mod routes;
mod services;
mod utils;

use crate::config::{Config, StoreBackend};
use crate::repositories::{InMemoryTransactionStore, MongoTransactionStore, TransactionStore};
use crate::routes::{build_router, AppState};
use crate::services::database;
use crate::services::seed_loader::{FileSeedSource, HttpSeedSource, SeedSource};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init();

    info!("Starting product dashboard API");
    let config = Config::from_env()?;

    let store: Arc<dyn TransactionStore> = match config.store_backend {
        StoreBackend::Mongo => {
            let db = database::connect_to_database(&config).await?;
            Arc::new(MongoTransactionStore::new(&db, &config.collection_name))
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory store; records are lost when the server stops");
            Arc::new(InMemoryTransactionStore::new())
        }
    };

    let seed_source: Arc<dyn SeedSource> = match &config.seed_file {
        Some(path) => Arc::new(FileSeedSource::new(path)),
        None => Arc::new(HttpSeedSource::new(&config.seed_url)),
    };
    info!("Seed source: {}", seed_source.describe());

    let state = AppState::new(store, seed_source, config.default_per_page);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server is running on port {}", config.port);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Could not listen for the shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
