use image_admission::config::{AppConfig, StoreBackend};
use image_admission::store::{ImageStore, MemoryStore, PostgresStore};
use image_admission::{serve, AccessGate};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging; sqlx statements only show up when query logging is on
    use env_logger::{Builder, Env};
    use log::LevelFilter;

    let sqlx_level = if config.database.log_queries {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("sqlx", sqlx_level)
        .init();

    log::info!(
        "Configuration loaded: server={}, backend={:?}",
        config.server_address(),
        config.database.backend
    );

    let gate = AccessGate::from_config(&config.auth)?;
    let listener = TcpListener::bind(config.server_address()).await?;

    match config.database.backend {
        StoreBackend::Postgres => {
            let url = config.database_url();
            let store = Arc::new(PostgresStore::new(&config.database, url.as_deref()).await?);

            log::info!("Running database migrations...");
            store.migrate().await?;

            serve(listener, store.clone(), gate, shutdown_signal()).await?;
            store.close().await;
        }
        StoreBackend::Memory => {
            log::warn!("Using the in-memory store; entries are lost on restart");
            serve(listener, Arc::new(MemoryStore::new()), gate, shutdown_signal()).await?;
        }
    }

    log::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
