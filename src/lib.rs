//! Plankton - a flight toy over signed-distance terrain
//!
//! Core modules:
//! - `sim`: Terrain blocks, aggregate field sampling, plankton flight
//! - `editor`: Selection and reversible Grab/Rotate/Resize gestures
//! - `persistence`: World document schema and single-flight saving
//! - `renderer`: GPU-ready block params and overlay line lists
//! - `platform`: Pointer state and key decoding
//! - `game`: The per-frame context tying it all together

pub mod camera;
pub mod editor;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod renderer;
#[cfg(not(target_arch = "wasm32"))]
pub mod server;
pub mod settings;
pub mod sim;

pub use game::{Frame, Game};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const TICK: f32 = 1.0 / 60.0;
    /// Longest frame the simulation will catch up on (tab stalls etc.)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Blend radius for combining blocks of one category
    pub const SMOOTH_K: f32 = 0.2;
    /// Field value used when a category has no blocks ("far outside")
    pub const FAR_FIELD: f32 = 10.0;
    /// Animation clock period, seconds. Every periodic effect divides it.
    pub const TIME_LOOP: f32 = 300.0;

    /// Smallest half-extent the editor will produce
    pub const MIN_RADIUS: f32 = 0.5;
    /// Size of the block array in the terrain shader
    pub const MAX_SHADER_BLOCKS: usize = 100;

    /// Where the plankton reappears after falling through the floor
    pub const RECOVERY_POINT: [f32; 2] = [10.0, 10.0];

    /// Resource path the world document is fetched from and saved to
    pub const WORLD_PATH: &str = "/world.json";
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Shader-style fractional part, always in [0, 1) (unlike `f32::fract`)
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fract_negative() {
        assert!((fract(-0.25) - 0.75).abs() < 1e-6);
        assert!((fract(2.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_angle() {
        use std::f32::consts::PI;
        assert!((normalize_angle(3.0 * PI) + PI).abs() < 1e-5);
        assert!((normalize_angle(-0.5) + 0.5).abs() < 1e-6);
    }
}
