//! Cookie/token session management for the Photon vendor API.
//!
//! The vendor authenticates with browser cookies rather than API keys, and
//! rotates them on nearly every response. This crate holds the in-memory
//! cookie set, merges updates observed from responses, and persists the full
//! set through a pluggable hook (default: a JSON file in the profile
//! directory).
//!
//! # Example
//!
//! ```rust,ignore
//! use photon_session::SessionManager;
//!
//! let session = SessionManager::with_profile_dir("./storage/profile/0")?;
//! session.add_access_token("eyJ...", "internal-api.virginia.labs.lumalabs.ai");
//! let header = session.cookie_header();
//! ```

mod cookie;
mod error;
mod manager;
mod persistence;

pub use cookie::{Cookie, ACCESS_TOKEN_COOKIE};
pub use error::{Error, Result};
pub use manager::SessionManager;
pub use persistence::{CookieFilePersistence, NoPersistence, PersistenceHook};
