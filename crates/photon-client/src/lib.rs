//! HTTP client for the Luma Dream Machine vendor API.
//!
//! The vendor has no public API; this client speaks to the same internal
//! endpoints the web app uses, authenticating with session cookies supplied
//! by [`photon_session::SessionManager`]. Cookies observed on every response
//! (success or failure) are merged back into the session before the status
//! is interpreted.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use photon_client::{GenerateParams, LumaClient};
//! use photon_session::SessionManager;
//!
//! # async fn example() -> photon_client::Result<()> {
//! let session = Arc::new(SessionManager::in_memory());
//! session.add_access_token("eyJ...", "internal-api.virginia.labs.lumalabs.ai");
//!
//! let client = LumaClient::builder().session(session).build()?;
//!
//! let id = client.generate(&GenerateParams::new("a cat")).await?;
//! let items = client.list_generations(0, 10).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;

pub use client::{ClientBuilder, GenerateParams, LumaClient, DEFAULT_API_BASE};
pub use error::{Error, Result};
