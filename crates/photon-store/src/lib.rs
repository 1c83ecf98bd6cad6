//! SQLite cache of completed generations.
//!
//! Maps vendor job ids to their first-seen terminal state. Rows are only
//! ever inserted: once a generation is cached with its completed video URL
//! it is never updated or deleted, so re-syncs are idempotent.

mod error;
mod store;

pub use error::{Error, Result};
pub use store::{GenerationRecord, GenerationStore};
