use std::sync::Arc;
use std::time::Duration;

use crate::builder::SessionStore;
use crate::config::Config;
use crate::export::engine::DocumentEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: Arc<SessionStore>,
    /// Pluggable document engine. Default: PdfEngine.
    pub engine: Arc<dyn DocumentEngine>,
}

impl AppState {
    pub fn new(config: Config, engine: Arc<dyn DocumentEngine>) -> Self {
        let sessions = Arc::new(SessionStore::new(
            config.max_sessions,
            Duration::from_secs(config.session_idle_secs),
        ));
        Self {
            config,
            sessions,
            engine,
        }
    }
}
