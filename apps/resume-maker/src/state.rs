use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::export::Rasterizer;
use crate::persistence::RemoteStore;
use crate::session::Session;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single editing session. Held only for mutations and snapshots;
    /// remote calls and rasterization run with it released.
    pub session: Arc<Mutex<Session>>,
    /// Publish API. `RemoteClient` in production, a fake in tests.
    pub remote: Arc<dyn RemoteStore>,
    /// Glyph rasterizer when a font is configured, greeking otherwise.
    pub rasterizer: Arc<dyn Rasterizer>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        session: Session,
        remote: Arc<dyn RemoteStore>,
        rasterizer: Arc<dyn Rasterizer>,
        config: Config,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            remote,
            rasterizer,
            config,
        }
    }
}
