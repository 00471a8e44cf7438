//! Terrain blocks
//!
//! A block is a rounded box with a category, a pose, and a noise seed. Its
//! distance field is roughened with procedural noise, so it is only
//! "distance-like": fine for thresholding and smooth blending, not for
//! exact ray marching.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::sdf::{noise, sd_rounded_box};
use crate::consts::MIN_RADIUS;
use crate::fract;

/// Terrain category of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BlockMode {
    Ground,
    Cave,
    Water,
    /// Water with periodic gaps drifting along its length
    WaterPulses,
}

impl BlockMode {
    pub const ALL: [BlockMode; 4] = [
        BlockMode::Ground,
        BlockMode::Cave,
        BlockMode::Water,
        BlockMode::WaterPulses,
    ];

    /// Both water modes share one field
    pub fn is_water(&self) -> bool {
        matches!(self, BlockMode::Water | BlockMode::WaterPulses)
    }

    /// Next mode in editor cycling order
    pub fn next(&self) -> Self {
        match self {
            BlockMode::Ground => BlockMode::Cave,
            BlockMode::Cave => BlockMode::Water,
            BlockMode::Water => BlockMode::WaterPulses,
            BlockMode::WaterPulses => BlockMode::Ground,
        }
    }
}

impl From<BlockMode> for u8 {
    fn from(mode: BlockMode) -> u8 {
        match mode {
            BlockMode::Ground => 0,
            BlockMode::Cave => 1,
            BlockMode::Water => 2,
            BlockMode::WaterPulses => 3,
        }
    }
}

/// Mode integer outside the known range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMode(pub u8);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown block mode {}", self.0)
    }
}

impl TryFrom<u8> for BlockMode {
    type Error = UnknownMode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BlockMode::Ground),
            1 => Ok(BlockMode::Cave),
            2 => Ok(BlockMode::Water),
            3 => Ok(BlockMode::WaterPulses),
            other => Err(UnknownMode(other)),
        }
    }
}

/// Stable identity of a block within a `World`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub u32);

/// A single terrain primitive
///
/// `right`/`up` are derived from `angle` and refreshed by every setter, so
/// fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    id: BlockId,
    mode: BlockMode,
    at: Vec2,
    angle: f32,
    radii: Vec2,
    round: f32,
    seed: f32,
    right: Vec2,
    up: Vec2,
}

impl Block {
    /// Create a block; `radii` and `round` are clamped to their minimums.
    /// The id is a placeholder until the block is inserted into a world.
    pub fn new(mode: BlockMode, at: Vec2, angle: f32, radii: Vec2, round: f32, seed: f32) -> Self {
        let mut block = Self {
            id: BlockId(0),
            mode,
            at,
            angle,
            radii: radii.max(Vec2::splat(MIN_RADIUS)),
            round: round.max(0.0),
            seed,
            right: Vec2::X,
            up: Vec2::Y,
        };
        block.update_frame();
        block
    }

    fn update_frame(&mut self) {
        self.right = Vec2::from_angle(self.angle);
        self.up = self.right.perp();
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: BlockId) {
        self.id = id;
    }

    pub fn mode(&self) -> BlockMode {
        self.mode
    }

    pub fn at(&self) -> Vec2 {
        self.at
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn radii(&self) -> Vec2 {
        self.radii
    }

    pub fn round(&self) -> f32 {
        self.round
    }

    pub fn seed(&self) -> f32 {
        self.seed
    }

    pub fn right(&self) -> Vec2 {
        self.right
    }

    pub fn up(&self) -> Vec2 {
        self.up
    }

    pub fn set_mode(&mut self, mode: BlockMode) {
        self.mode = mode;
    }

    pub fn set_at(&mut self, at: Vec2) {
        self.at = at;
        self.update_frame();
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
        self.update_frame();
    }

    /// Set half-extents, each clamped to `MIN_RADIUS`
    pub fn set_radii(&mut self, radii: Vec2) {
        self.radii = radii.max(Vec2::splat(MIN_RADIUS));
        self.update_frame();
    }

    /// Set corner rounding, clamped to be non-negative
    pub fn set_round(&mut self, round: f32) {
        self.round = round.max(0.0);
        self.update_frame();
    }

    pub fn set_seed(&mut self, seed: f32) {
        self.seed = seed;
    }

    /// Rounding actually used by the field: never more than the smaller
    /// half-extent, which would turn the box inside out
    pub fn effective_round(&self) -> f32 {
        self.round.min(self.radii.min_element())
    }

    /// World point into the block's rotated frame
    #[inline]
    pub fn to_local(&self, point: Vec2) -> Vec2 {
        let d = point - self.at;
        Vec2::new(d.dot(self.right), d.dot(self.up))
    }

    /// Local point back into world space
    #[inline]
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        self.at + self.right * local.x + self.up * local.y
    }

    /// Pick test against the plain (unrounded) box in local space
    pub fn hovered(&self, local: Vec2) -> bool {
        local.x.abs() < self.radii.x && local.y.abs() < self.radii.y
    }

    /// Distance-like field value at `point`; negative inside
    pub fn sample(&self, point: Vec2, time: f32) -> f32 {
        let local = self.to_local(point);
        let round = self.effective_round();
        let seed = self.seed * 16.0;

        let mut dis = sd_rounded_box(local, self.radii, round);

        if self.mode == BlockMode::WaterPulses {
            let spacing = 2.0 * self.radii.y;
            let wrap = (fract(local.x / spacing + fract(time / 10.0)) - 0.5) * spacing;
            let gap = sd_rounded_box(Vec2::new(wrap, local.y), Vec2::splat(self.radii.y), round);
            dis = dis.max(gap);
        }

        dis += 0.2 * (noise(local / 1.5 + Vec2::splat(seed), 0.0) + 1.0);
        dis += 0.1 * (noise(local / 0.7 - Vec2::splat(5.0) + Vec2::splat(seed), 0.0) + 1.0);

        if self.mode.is_water() {
            let phase = time * std::f32::consts::TAU + seed;
            dis += 0.05 * noise(local / 0.3, phase);
        }

        dis
    }

    /// The four corners of the unrounded box, counter-clockwise
    pub fn corners(&self) -> [Vec2; 4] {
        let r = self.radii;
        [
            self.to_world(Vec2::new(-r.x, -r.y)),
            self.to_world(Vec2::new(r.x, -r.y)),
            self.to_world(Vec2::new(r.x, r.y)),
            self.to_world(Vec2::new(-r.x, r.y)),
        ]
    }
}
