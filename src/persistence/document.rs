//! On-disk world document
//!
//! `{ "blocks": [ {mode, at, angle, radii, round, seed}, ... ] }`. Only the
//! editable fields are stored; block frames and ids are rebuilt on load.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::PersistError;
use crate::consts::MIN_RADIUS;
use crate::sim::{Block, BlockMode};

/// One persisted block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub mode: BlockMode,
    pub at: Vec2,
    pub angle: f32,
    pub radii: Vec2,
    pub round: f32,
    pub seed: f32,
}

impl BlockRecord {
    /// Check the record describes a block the editor could have produced
    pub fn validate(&self) -> Result<(), &'static str> {
        let numbers = [
            self.at.x,
            self.at.y,
            self.angle,
            self.radii.x,
            self.radii.y,
            self.round,
            self.seed,
        ];
        if numbers.iter().any(|n| !n.is_finite()) {
            return Err("non-finite number");
        }
        if self.radii.min_element() < MIN_RADIUS {
            return Err("radius below minimum");
        }
        if self.round < 0.0 {
            return Err("negative rounding");
        }
        Ok(())
    }

    pub fn to_block(&self) -> Block {
        Block::new(self.mode, self.at, self.angle, self.radii, self.round, self.seed)
    }
}

impl From<&Block> for BlockRecord {
    fn from(block: &Block) -> Self {
        Self {
            mode: block.mode(),
            at: block.at(),
            angle: block.angle(),
            radii: block.radii(),
            round: block.round(),
            seed: block.seed(),
        }
    }
}

/// The whole persisted world
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldDocument {
    pub blocks: Vec<BlockRecord>,
}

impl WorldDocument {
    pub fn from_blocks<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> Self {
        Self {
            blocks: blocks.into_iter().map(BlockRecord::from).collect(),
        }
    }

    /// Parse and validate; any bad record rejects the whole document
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        let doc: WorldDocument = serde_json::from_str(json)?;
        doc.validate()?;
        Ok(doc)
    }

    pub fn validate(&self) -> Result<(), PersistError> {
        for (index, record) in self.blocks.iter().enumerate() {
            record
                .validate()
                .map_err(|reason| PersistError::InvalidBlock { index, reason })?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Build fresh blocks (ids are assigned by the world)
    pub fn to_blocks(&self) -> Vec<Block> {
        self.blocks.iter().map(BlockRecord::to_block).collect()
    }
}
