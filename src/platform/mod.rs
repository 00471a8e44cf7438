//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Pointer state and key decoding (`input`)

pub mod input;

pub use input::{Pointer, command_for_key};
