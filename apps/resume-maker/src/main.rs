mod config;
mod editor;
mod errors;
mod export;
mod models;
mod persistence;
mod render;
mod routes;
mod session;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::{GlyphRasterizer, GreekingRasterizer, Rasterizer};
use crate::persistence::{FileStore, RemoteClient};
use crate::routes::build_router;
use crate::session::Session;
use crate::state::AppState;

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

    info!("Starting resume-maker v{}", env!("CARGO_PKG_VERSION"));

    // Local durable mirror of the working Document
    let store = Arc::new(FileStore::new(&config.store_dir));
    info!("Local store at {}", config.store_dir.display());
    let session = Session::open(store);

    // Publish API client
    let remote = RemoteClient::new(&config.remote_api_url, config.remote_timeout)
        .context("REMOTE_API_URL must be an absolute http(s) URL")?;
    info!(
        "Remote API at {} (timeout {}s)",
        config.remote_api_url,
        config.remote_timeout.as_secs()
    );

    let rasterizer = build_rasterizer(&config);

    let state = AppState::new(session, Arc::new(remote), rasterizer, config.clone());

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Glyph rasterizer when FONT_PATH loads; greeking otherwise.
fn build_rasterizer(config: &Config) -> Arc<dyn Rasterizer> {
    let Some(path) = &config.font_path else {
        info!("FONT_PATH not set, PDF text will be greeked");
        return Arc::new(GreekingRasterizer);
    };
    match GlyphRasterizer::from_file(path) {
        Ok(rasterizer) => {
            info!("Export font loaded from {}", path.display());
            Arc::new(rasterizer)
        }
        Err(e) => {
            warn!("{e}; falling back to greeked PDF text");
            Arc::new(GreekingRasterizer)
        }
    }
}
