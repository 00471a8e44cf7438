//! Vertex types for 2D overlay rendering

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn at(p: Vec2, color: [f32; 4]) -> Self {
        Self::new(p.x, p.y, color)
    }
}

/// Colors for overlay elements
pub mod colors {
    pub const GRID: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
    pub const HORIZON: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const AXIS_X: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const AXIS_Y: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const CURSOR: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const BLOCK: [f32; 4] = [0.5, 0.5, 0.2, 1.0];
    pub const BLOCK_SELECTED: [f32; 4] = [0.9, 0.9, 0.0, 1.0];
    pub const PLANKTON: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    /// Brighten each color channel for the hovered block
    pub fn hovered(color: [f32; 4]) -> [f32; 4] {
        [color[0] + 0.1, color[1] + 0.1, color[2] + 0.1, color[3]]
    }
}
