//! Per-block shader parameters

use bytemuck::{Pod, Zeroable};

use crate::consts::MAX_SHADER_BLOCKS;
use crate::sim::{Block, World};

/// One block as the terrain shader sees it: three columns of a 3x3 matrix
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BlockParams {
    /// (at.x, at.y, seed)
    pub position: [f32; 3],
    /// (right.x, right.y, mode)
    pub frame: [f32; 3],
    /// (radii.x, radii.y, effective round)
    pub shape: [f32; 3],
}

impl From<&Block> for BlockParams {
    fn from(block: &Block) -> Self {
        let at = block.at();
        let right = block.right();
        let radii = block.radii();
        Self {
            position: [at.x, at.y, block.seed()],
            frame: [right.x, right.y, u8::from(block.mode()) as f32],
            shape: [radii.x, radii.y, block.effective_round()],
        }
    }
}

/// Pack the world's blocks in order, truncated to the shader array size
pub fn pack_blocks(world: &World) -> Vec<BlockParams> {
    let blocks = world.blocks();
    if blocks.len() > MAX_SHADER_BLOCKS {
        log::warn!(
            "{} blocks exceed the shader limit, drawing the first {}",
            blocks.len(),
            MAX_SHADER_BLOCKS
        );
    }
    blocks
        .iter()
        .take(MAX_SHADER_BLOCKS)
        .map(BlockParams::from)
        .collect()
}
