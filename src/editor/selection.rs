//! Selected block set, keyed by block id

use std::collections::BTreeSet;

use crate::sim::{BlockId, World};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<BlockId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Replace the selection with exactly `ids`
    pub fn set(&mut self, ids: impl IntoIterator<Item = BlockId>) {
        self.ids = ids.into_iter().collect();
    }

    /// Flip membership of `id`
    pub fn toggle(&mut self, id: BlockId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Selected ids in world order, dropping any that no longer exist
    pub fn in_world_order(&self, world: &World) -> Vec<BlockId> {
        world
            .blocks()
            .iter()
            .map(|b| b.id())
            .filter(|id| self.ids.contains(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Block, BlockMode};
    use glam::Vec2;

    #[test]
    fn test_toggle() {
        let mut selection = Selection::new();
        selection.toggle(BlockId(3));
        assert!(selection.contains(BlockId(3)));
        selection.toggle(BlockId(3));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_world_order_skips_missing() {
        let block = || Block::new(BlockMode::Ground, Vec2::ZERO, 0.0, Vec2::ONE, 0.0, 0.0);
        let world = World::from_blocks(vec![block(), block(), block()]);
        let mut selection = Selection::new();
        selection.set([BlockId(3), BlockId(1), BlockId(42)]);
        assert_eq!(selection.in_world_order(&world), vec![BlockId(1), BlockId(3)]);
    }
}
