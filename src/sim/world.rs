//! The terrain world: all blocks, the animation clock, load/save state
//!
//! Sampling visits every block (no spatial index), so each query is O(n) in
//! the number of blocks. The shader does the same per pixel.

use glam::Vec2;

use super::block::{Block, BlockId, BlockMode};
use super::sdf::smooth_min;
use crate::consts::{FAR_FIELD, SMOOTH_K, TIME_LOOP};
use crate::persistence::{PersistError, SaveQueue, SaveState, WorldDocument};

/// What occupies a sampled point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medium {
    Air,
    Ground,
    Water,
}

/// Result of sampling the combined field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSample {
    pub medium: Medium,
    /// Depth into `medium` (for open air: clearance above the ground field)
    pub amount: f32,
    /// Point is inside a cave carved out of ground
    pub cave: bool,
}

/// Per-category smooth-minimum field values at one point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryFields {
    pub ground: f32,
    pub cave: f32,
    pub water: f32,
}

impl CategoryFields {
    /// Combine the three fields; caves win over ground, water fills caves
    pub fn classify(&self) -> FieldSample {
        let (ground, cave, water) = (self.ground, self.cave, self.water);
        if ground < 0.0 && cave < 0.0 {
            if water < 0.0 {
                FieldSample { medium: Medium::Water, amount: -water, cave: true }
            } else {
                FieldSample { medium: Medium::Air, amount: -cave, cave: true }
            }
        } else if ground < 0.0 {
            FieldSample { medium: Medium::Ground, amount: -ground, cave: false }
        } else if water < 0.0 {
            FieldSample { medium: Medium::Water, amount: -water, cave: false }
        } else {
            FieldSample { medium: Medium::Air, amount: ground, cave: false }
        }
    }
}

/// The level being played and edited
#[derive(Debug, Clone)]
pub struct World {
    blocks: Vec<Block>,
    time: f32,
    pending: bool,
    save: SaveQueue,
    next_id: u32,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Built-in level, marked pending until the saved document arrives
    pub fn new() -> Self {
        use std::f32::consts::FRAC_PI_2;
        let mut world = Self::from_blocks(vec![
            Block::new(BlockMode::Ground, Vec2::new(0.0, 0.0), 0.0, Vec2::new(6.0, 1.5), 1.5, 0.0),
            Block::new(BlockMode::Ground, Vec2::new(5.0, -2.0), -0.3, Vec2::new(2.0, 1.0), 1.0, 0.0),
            Block::new(BlockMode::Cave, Vec2::new(3.0, -1.0), FRAC_PI_2, Vec2::new(4.0, 1.5), 2.0, 0.0),
            Block::new(BlockMode::Water, Vec2::new(-3.0, -3.0), 0.0, Vec2::new(2.0, 2.0), 2.0, 0.0),
        ]);
        world.pending = true;
        world
    }

    /// A world holding exactly `blocks`, not waiting on any load
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let mut world = Self {
            blocks: Vec::with_capacity(blocks.len()),
            time: 0.0,
            pending: false,
            save: SaveQueue::new(),
            next_id: 1,
        };
        for block in blocks {
            world.insert(block);
        }
        world
    }

    fn next_block_id(&mut self) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id() == id)
    }

    /// Append a block, giving it a fresh id
    pub fn insert(&mut self, mut block: Block) -> BlockId {
        let id = self.next_block_id();
        block.set_id(id);
        self.blocks.push(block);
        id
    }

    /// Remove every listed block; returns how many were removed
    pub fn remove(&mut self, ids: &[BlockId]) -> usize {
        let before = self.blocks.len();
        self.blocks.retain(|b| !ids.contains(&b.id()));
        before - self.blocks.len()
    }

    /// Deep-copy the listed blocks (in world order) and append the copies
    pub fn duplicate(&mut self, ids: &[BlockId]) -> Vec<BlockId> {
        let copies: Vec<Block> = self
            .blocks
            .iter()
            .filter(|b| ids.contains(&b.id()))
            .cloned()
            .collect();
        copies.into_iter().map(|b| self.insert(b)).collect()
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance the animation clock, wrapping at `TIME_LOOP`
    pub fn advance(&mut self, dt: f32) {
        self.time = (self.time + dt).rem_euclid(TIME_LOOP);
    }

    /// True until the startup load has resolved
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Smooth-minimum field of each category at `point`
    // TODO: bucket blocks into a coarse grid so a query only visits nearby blocks
    pub fn category_fields(&self, point: Vec2) -> CategoryFields {
        let mut fields = CategoryFields {
            ground: FAR_FIELD,
            cave: FAR_FIELD,
            water: FAR_FIELD,
        };
        for block in &self.blocks {
            let d = block.sample(point, self.time);
            let slot = match block.mode() {
                BlockMode::Ground => &mut fields.ground,
                BlockMode::Cave => &mut fields.cave,
                BlockMode::Water | BlockMode::WaterPulses => &mut fields.water,
            };
            *slot = smooth_min(*slot, d, SMOOTH_K);
        }
        fields
    }

    /// Classify `point` against the whole terrain
    pub fn sample(&self, point: Vec2) -> FieldSample {
        self.category_fields(point).classify()
    }

    /// Blocks whose unrounded box contains `point`, in world order
    pub fn under_mouse(&self, point: Vec2) -> Vec<BlockId> {
        self.blocks
            .iter()
            .filter(|b| b.hovered(b.to_local(point)))
            .map(|b| b.id())
            .collect()
    }

    /// Snapshot of the persisted fields
    pub fn document(&self) -> WorldDocument {
        WorldDocument::from_blocks(&self.blocks)
    }

    /// Resolve the startup load. On failure the current blocks stay.
    pub fn finish_load(&mut self, result: Result<String, PersistError>) {
        match result.and_then(|json| WorldDocument::from_json(&json)) {
            Ok(doc) => {
                self.blocks.clear();
                for block in doc.to_blocks() {
                    self.insert(block);
                }
                log::info!("Loaded world ({} blocks)", self.blocks.len());
            }
            Err(e) => log::error!("World load failed, keeping defaults: {}", e),
        }
        self.pending = false;
    }

    pub fn save_state(&self) -> SaveState {
        self.save.state()
    }

    /// Ask for a save. Returns the document to send if one should go out now.
    pub fn request_save(&mut self) -> Option<String> {
        if self.save.request() {
            self.serialize_for_save()
        } else {
            None
        }
    }

    /// The in-flight save finished. Returns the trailing save, if one was
    /// requested meanwhile.
    pub fn finish_save(&mut self, result: Result<u16, PersistError>) -> Option<String> {
        match result {
            Ok(status) => log::info!("World saved ({})", status),
            Err(e) => log::error!("World save failed: {}", e),
        }
        if self.save.complete() {
            self.serialize_for_save()
        } else {
            None
        }
    }

    fn serialize_for_save(&mut self) -> Option<String> {
        match self.document().to_json() {
            Ok(json) => Some(json),
            Err(e) => {
                log::error!("Could not serialize world: {}", e);
                self.save.abandon();
                None
            }
        }
    }
}
