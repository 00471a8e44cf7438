//! Rendering boundary
//!
//! Terrain is drawn by a fragment shader that evaluates the block fields per
//! pixel; the overlay is a plain line list. This module only produces the
//! flat arrays both draws consume, so it has no GPU dependency and is fully
//! testable on the host.

pub mod blocks;
pub mod lines;
pub mod vertex;

pub use blocks::{BlockParams, pack_blocks};
pub use lines::LineList;
pub use vertex::{Vertex, colors};
