//! Nova Events API server: entry point.
//!
//! Organizers create events, lay out invitation cards, configure payment
//! channels and manage guest lists; guests reach their personal contribution
//! page through a per-guest link. State lives in SQLite.

mod api;
mod config;
mod db;
mod errors;
mod feed;
mod service;
mod store;
mod uploads;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::Config;
use feed::ChangeFeed;
use service::{Registry, Settings};
use store::Store;
use uploads::BackgroundUploads;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    let pool = db::init_pool(&config.database_url, config.db_max_connections).await?;
    let shutdown = CancellationToken::new();

    let registry = Registry::new(
        Store::sqlite(pool.clone()),
        ChangeFeed::new(),
        Settings {
            default_pledge: config.default_pledge_amount,
            public_base_url: config.public_base_url.clone(),
        },
    );

    // ─── Change feed logger ───────────────────────────────
    let logger = tokio::spawn(feed::log_changes(
        registry.feed().subscribe(),
        shutdown.clone(),
    ));

    // ─── REST API ─────────────────────────────────────────
    let uploads = BackgroundUploads::new(&config.upload_dir, config.upload_max_bytes);
    tokio::fs::create_dir_all(uploads.dir()).await?;

    let app = api::router(Arc::new(api::ApiState { registry, uploads }));

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let signal = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {e}");
            }
            info!("Shutdown requested");
            signal.cancel();
        })
        .await?;

    shutdown.cancel();
    let _ = logger.await;
    pool.close().await;
    info!("Server stopped");
    Ok(())
}
