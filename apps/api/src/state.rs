use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::llm_client::GenerationService;
use crate::session::store::SessionStore;
use crate::storage::SnapshotStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub snapshots: SnapshotStore,
    /// Pluggable generation backend. Default: GeminiClient.
    pub llm: Arc<dyn GenerationService>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, llm: Arc<dyn GenerationService>) -> Self {
        Self {
            sessions: SessionStore::new(
                config.max_sessions,
                Duration::from_secs(config.session_idle_secs),
            ),
            snapshots: SnapshotStore::new(config.data_dir.clone()),
            llm,
            config,
        }
    }
}
