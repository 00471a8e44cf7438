//! Terrain and flight simulation
//!
//! Pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (world block order)
//! - No rendering or platform dependencies

pub mod block;
pub mod plankton;
pub mod sdf;
pub mod world;

pub use block::{Block, BlockId, BlockMode};
pub use plankton::{Plankton, PlanktonInput};
pub use sdf::{noise, sd_rounded_box, smooth_min};
pub use world::{CategoryFields, FieldSample, Medium, World};
