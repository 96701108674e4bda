use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use racing_fence_pricing::cache::AppCache;
use racing_fence_pricing::config::Config;
use racing_fence_pricing::pricing::reference::ReferenceData;
use racing_fence_pricing::pricing::store::{MemoryRecordStore, PgRecordStore, RecordStore};
use racing_fence_pricing::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "racing_fence_pricing=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Invalid configuration")?;

    let reference = match &config.reference_data_path {
        Some(path) => ReferenceData::from_json_file(path)?,
        None => ReferenceData::standard(),
    };
    info!(
        "Reference data ready: {} countries, {} UK fence types",
        reference.countries().len(),
        reference.uk_fence_types().len()
    );

    let store: Arc<dyn RecordStore> = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(url)
                .await
                .context("Failed to connect to database")?;
            info!("Connected to database");
            Arc::new(
                PgRecordStore::connect(pool)
                    .await
                    .context("Failed to prepare calculation records table")?,
            )
        }
        None => {
            warn!("DATABASE_URL not set; archived calculations are kept in memory only");
            Arc::new(MemoryRecordStore::new())
        }
    };

    let state = AppState::new(
        store,
        AppCache::new(config.listing_cache_ttl),
        Arc::new(reference),
        config.listing_limit,
    );

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app(state, &config.cors_origins))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
