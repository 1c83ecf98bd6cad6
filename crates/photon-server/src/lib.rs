//! REST façade over the Photon vendor client and generation cache.
//!
//! Exposes three operations to outside callers: submit a generation
//! (multipart, with an optional starting image), list generations, and
//! fetch one by id from the local cache after a re-sync.
//!
//! # Example
//!
//! ```ignore
//! use photon_server::{AppState, Server, ServerConfig};
//!
//! let state = AppState::new(client, store, ServerConfig::default());
//! Server::from_state(state).run().await?;
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use state::AppState;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// The Photon façade server.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a server from a pre-built application state.
    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        use axum::routing::{get, post};

        Router::new()
            .merge(routes::health_routes())
            .nest(
                "/api/v1",
                Router::new()
                    .route("/generate", post(routes::generate_handler))
                    .route("/generations", get(routes::list_generations_handler))
                    .route("/generations/{id}", get(routes::get_generation_handler)),
            )
            .layer(DefaultBodyLimit::max(self.state.config.max_body_size))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind and serve until shutdown.
    pub async fn run(self) -> Result<()> {
        let addr = self.state.config.bind_address;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Internal(format!("failed to bind {addr}: {e}")))?;

        info!(%addr, "Façade listening");
        axum::serve(listener, self.router())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
