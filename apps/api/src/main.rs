mod config;
mod db;
mod errors;
mod identity;
mod models;
mod preview;
mod render;
mod resumes;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::identity::HeaderIdentityResolver;
use crate::preview::PreviewSessions;
use crate::render::{ExportAdapter, RenderingEngine, WkhtmltopdfEngine};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{MemoryRecordStore, PgRecordStore, RecordStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Record store: PostgreSQL when configured, otherwise in-process demo store
    let store: Arc<dyn RecordStore> = match &config.database_url {
        Some(url) => Arc::new(PgRecordStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set. Records are kept in memory and lost on restart.");
            Arc::new(MemoryRecordStore::new())
        }
    };

    // Rendering engine: probed once here for the log; every export re-checks
    let engine = WkhtmltopdfEngine::new(&config.pdf_engine_bin);
    if engine.is_available().await {
        info!("PDF engine: {}", config.pdf_engine_bin);
    } else {
        warn!(
            "PDF engine '{}' not found. Exports will fail until it is installed.",
            config.pdf_engine_bin
        );
    }

    if config.anonymous_fallback {
        warn!(
            "Anonymous fallback enabled: requests without an identity act as {}",
            config.placeholder_user_id
        );
    }

    let state = AppState {
        store,
        identity: Arc::new(HeaderIdentityResolver),
        exporter: ExportAdapter::new(Arc::new(engine)),
        previews: PreviewSessions::new(),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
