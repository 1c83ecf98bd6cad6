//! Application state shared across handlers.

use std::sync::Arc;

use photon_client::LumaClient;
use photon_store::GenerationStore;

use crate::config::ServerConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Vendor API client (carries the session).
    pub client: LumaClient,

    /// Local cache of completed generations.
    pub store: Arc<GenerationStore>,

    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(client: LumaClient, store: GenerationStore, config: ServerConfig) -> Self {
        Self {
            client,
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}
