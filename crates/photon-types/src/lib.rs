//! Shared types for the Photon video-generation bridge.
//!
//! These are the value objects exchanged with the vendor API and passed
//! between the client, store, and façade crates.

mod generation;

pub use generation::{GenerationItem, GenerationState, Video};
