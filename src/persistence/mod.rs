//! World persistence
//!
//! Features:
//! - JSON document schema with per-record validation
//! - Single-flight save coalescing (`SaveQueue`)
//! - GET/PUT transport via `fetch` (wasm only)

pub mod document;
pub mod error;
pub mod save;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use document::{BlockRecord, WorldDocument};
pub use error::PersistError;
pub use save::{SaveQueue, SaveState};
