//! Level editor
//!
//! Keyboard commands and pointer clicks mutate the `World` through here.
//! Every method that changes persisted block state returns `true` so the
//! caller can request a save.

pub mod action;
pub mod selection;

pub use action::{Action, ActionKind};
pub use selection::Selection;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::{BlockId, World};

/// Semantic editor input, decoded from keys by the platform layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    ToggleEditMode,
    SelectAll,
    Duplicate,
    Delete,
    BeginGrab,
    BeginRotate,
    BeginResize { round: bool },
    Cancel,
    /// Step through overlapping blocks under the pointer
    CyclePick,
    RandomizeSeed,
    CycleMode,
}

#[derive(Debug)]
pub struct Editor {
    enabled: bool,
    selection: Selection,
    action: Option<Action>,
    hovered: Option<BlockId>,
    pick_offset: usize,
    rng: Pcg32,
}

impl Editor {
    pub fn new(enabled: bool, seed: u64) -> Self {
        Self {
            enabled,
            selection: Selection::new(),
            action: None,
            hovered: None,
            pick_offset: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn hovered(&self) -> Option<BlockId> {
        self.hovered
    }

    /// Apply a command. Returns true if a save should be requested.
    pub fn command(&mut self, cmd: EditorCommand, world: &mut World, pointer: Option<Vec2>) -> bool {
        if cmd == EditorCommand::ToggleEditMode {
            if let Some(action) = self.action.take() {
                action.cancel(world);
            }
            self.enabled = !self.enabled;
            log::info!("Edit mode {}", if self.enabled { "on" } else { "off" });
            return false;
        }
        if !self.enabled {
            return false;
        }

        if cmd == EditorCommand::Cancel {
            if let Some(action) = self.action.take() {
                log::debug!("Cancelled {:?}", action.kind());
                action.cancel(world);
            }
            return false;
        }
        if self.action.is_some() {
            log::debug!("Ignoring {:?} during a live action", cmd);
            return false;
        }

        match cmd {
            EditorCommand::SelectAll => {
                self.selection.set(world.blocks().iter().map(|b| b.id()));
                false
            }
            EditorCommand::Duplicate => {
                let ids = self.selection.in_world_order(world);
                if ids.is_empty() {
                    return false;
                }
                let copies = world.duplicate(&ids);
                self.selection.set(copies.iter().copied());
                self.begin(ActionKind::Grab, world, pointer);
                true
            }
            EditorCommand::Delete => {
                let ids = self.selection.in_world_order(world);
                self.selection.clear();
                self.hovered = None;
                world.remove(&ids) > 0
            }
            EditorCommand::BeginGrab => self.begin(ActionKind::Grab, world, pointer),
            EditorCommand::BeginRotate => self.begin(ActionKind::Rotate, world, pointer),
            EditorCommand::BeginResize { round } => {
                self.begin(ActionKind::Resize { round }, world, pointer)
            }
            EditorCommand::CyclePick => {
                self.pick_offset = self.pick_offset.wrapping_add(1);
                false
            }
            EditorCommand::RandomizeSeed => {
                let ids = self.selection.in_world_order(world);
                for &id in &ids {
                    let seed = self.rng.random::<f32>();
                    if let Some(block) = world.block_mut(id) {
                        block.set_seed(seed);
                    }
                }
                !ids.is_empty()
            }
            EditorCommand::CycleMode => {
                let ids = self.selection.in_world_order(world);
                for &id in &ids {
                    if let Some(block) = world.block_mut(id) {
                        block.set_mode(block.mode().next());
                    }
                }
                !ids.is_empty()
            }
            EditorCommand::ToggleEditMode | EditorCommand::Cancel => false,
        }
    }

    /// Start a gesture on the selection; never requests a save by itself
    fn begin(&mut self, kind: ActionKind, world: &World, pointer: Option<Vec2>) -> bool {
        let Some(pointer) = pointer else {
            return false;
        };
        let ids = self.selection.in_world_order(world);
        self.action = Action::begin(kind, world, &ids, pointer);
        if self.action.is_some() {
            log::debug!("Began {:?} on {} blocks", kind, ids.len());
        }
        false
    }

    /// Pointer click. Commits a live action (returns true), or else picks.
    pub fn click(&mut self, world: &mut World, pointer: Option<Vec2>, additive: bool) -> bool {
        if !self.enabled {
            return false;
        }
        if let Some(action) = self.action.take() {
            log::debug!("Committed {:?}", action.kind());
            // Without a pointer the last update already holds the final pose
            if let Some(p) = pointer {
                action.commit(world, p);
            }
            return true;
        }

        match self.hovered {
            Some(id) if additive => self.selection.toggle(id),
            Some(id) => self.selection.set([id]),
            None if !additive => self.selection.clear(),
            None => {}
        }
        false
    }

    /// Per-frame refresh of the hovered block and the live action
    pub fn update(&mut self, world: &mut World, pointer: Option<Vec2>) {
        if !self.enabled {
            self.hovered = None;
            return;
        }
        self.hovered = pointer.and_then(|p| {
            let under = world.under_mouse(p);
            (!under.is_empty()).then(|| under[self.pick_offset % under.len()])
        });
        if let (Some(action), Some(p)) = (&self.action, pointer) {
            action.update(world, p);
        }
    }

    /// Forget everything tied to the previous block set (after a reload)
    pub fn reset(&mut self) {
        self.action = None;
        self.selection.clear();
        self.hovered = None;
        self.pick_offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Block, BlockMode};

    fn setup() -> (Editor, World) {
        let world = World::from_blocks(vec![
            Block::new(BlockMode::Ground, Vec2::ZERO, 0.0, Vec2::new(2.0, 1.0), 0.0, 0.0),
            Block::new(BlockMode::Cave, Vec2::new(1.0, 0.0), 0.0, Vec2::new(2.0, 1.0), 0.0, 0.0),
            Block::new(BlockMode::Water, Vec2::new(8.0, 0.0), 0.0, Vec2::ONE, 0.0, 0.0),
        ]);
        (Editor::new(true, 7), world)
    }

    #[test]
    fn test_disabled_ignores_commands() {
        let (mut editor, mut world) = setup();
        editor.command(EditorCommand::ToggleEditMode, &mut world, None);
        assert!(!editor.enabled());
        editor.command(EditorCommand::SelectAll, &mut world, None);
        assert!(!editor.command(EditorCommand::Delete, &mut world, None));
        assert_eq!(world.blocks().len(), 3);
    }

    #[test]
    fn test_click_selects_hovered() {
        let (mut editor, mut world) = setup();
        editor.update(&mut world, Some(Vec2::new(8.0, 0.0)));
        assert_eq!(editor.hovered(), Some(BlockId(3)));
        assert!(!editor.click(&mut world, Some(Vec2::new(8.0, 0.0)), false));
        assert!(editor.selection().contains(BlockId(3)));

        editor.update(&mut world, Some(Vec2::new(0.0, 5.0)));
        assert_eq!(editor.hovered(), None);
        editor.click(&mut world, Some(Vec2::new(0.0, 5.0)), true);
        assert_eq!(editor.selection().len(), 1);
        editor.click(&mut world, Some(Vec2::new(0.0, 5.0)), false);
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_cycle_pick() {
        let (mut editor, mut world) = setup();
        let p = Some(Vec2::new(0.5, 0.0));
        editor.update(&mut world, p);
        assert_eq!(editor.hovered(), Some(BlockId(1)));
        editor.command(EditorCommand::CyclePick, &mut world, p);
        editor.update(&mut world, p);
        assert_eq!(editor.hovered(), Some(BlockId(2)));
        editor.command(EditorCommand::CyclePick, &mut world, p);
        editor.update(&mut world, p);
        assert_eq!(editor.hovered(), Some(BlockId(1)));
    }

    #[test]
    fn test_grab_then_click_commits() {
        let (mut editor, mut world) = setup();
        editor.command(EditorCommand::SelectAll, &mut world, None);
        editor.command(EditorCommand::BeginGrab, &mut world, Some(Vec2::ZERO));
        assert!(editor.action().is_some());

        // Second begin is ignored while live
        editor.command(EditorCommand::BeginRotate, &mut world, Some(Vec2::ZERO));
        assert_eq!(editor.action().map(|a| a.kind()), Some(ActionKind::Grab));

        editor.update(&mut world, Some(Vec2::new(0.0, 2.0)));
        assert!(editor.click(&mut world, Some(Vec2::new(0.0, 3.0)), false));
        assert!(editor.action().is_none());
        assert_eq!(world.block(BlockId(3)).unwrap().at(), Vec2::new(8.0, 3.0));
    }

    #[test]
    fn test_begin_needs_selection() {
        let (mut editor, mut world) = setup();
        editor.command(EditorCommand::BeginGrab, &mut world, Some(Vec2::ZERO));
        assert!(editor.action().is_none());
    }

    #[test]
    fn test_duplicate_then_cancel_keeps_copies() {
        let (mut editor, mut world) = setup();
        editor.update(&mut world, Some(Vec2::new(8.0, 0.0)));
        editor.click(&mut world, Some(Vec2::new(8.0, 0.0)), false);

        assert!(editor.command(EditorCommand::Duplicate, &mut world, Some(Vec2::new(8.0, 0.0))));
        assert_eq!(world.blocks().len(), 4);
        assert!(editor.selection().contains(BlockId(4)));
        assert!(!editor.selection().contains(BlockId(3)));

        editor.update(&mut world, Some(Vec2::new(10.0, 0.0)));
        assert_eq!(world.block(BlockId(4)).unwrap().at(), Vec2::new(10.0, 0.0));

        editor.command(EditorCommand::Cancel, &mut world, None);
        assert_eq!(world.blocks().len(), 4);
        assert_eq!(world.block(BlockId(4)).unwrap().at(), Vec2::new(8.0, 0.0));
        assert_eq!(world.block(BlockId(3)).unwrap().at(), Vec2::new(8.0, 0.0));
    }

    #[test]
    fn test_toggle_off_cancels_action() {
        let (mut editor, mut world) = setup();
        editor.command(EditorCommand::SelectAll, &mut world, None);
        editor.command(EditorCommand::BeginGrab, &mut world, Some(Vec2::ZERO));
        editor.update(&mut world, Some(Vec2::new(5.0, 5.0)));
        editor.command(EditorCommand::ToggleEditMode, &mut world, None);
        assert!(editor.action().is_none());
        assert_eq!(world.block(BlockId(1)).unwrap().at(), Vec2::ZERO);
    }

    #[test]
    fn test_delete_clears_selection() {
        let (mut editor, mut world) = setup();
        editor.command(EditorCommand::SelectAll, &mut world, None);
        assert!(editor.command(EditorCommand::Delete, &mut world, None));
        assert!(world.blocks().is_empty());
        assert!(editor.selection().is_empty());
        assert!(!editor.command(EditorCommand::Delete, &mut world, None));
    }

    #[test]
    fn test_seed_and_mode_edits() {
        let (mut editor, mut world) = setup();
        editor.command(EditorCommand::SelectAll, &mut world, None);
        assert!(editor.command(EditorCommand::RandomizeSeed, &mut world, None));
        for block in world.blocks() {
            assert!((0.0..1.0).contains(&block.seed()));
        }

        assert!(editor.command(EditorCommand::CycleMode, &mut world, None));
        let modes: Vec<_> = world.blocks().iter().map(|b| b.mode()).collect();
        assert_eq!(modes, vec![BlockMode::Cave, BlockMode::Water, BlockMode::WaterPulses]);
    }

    #[test]
    fn test_reset_drops_state() {
        let (mut editor, mut world) = setup();
        editor.command(EditorCommand::SelectAll, &mut world, None);
        editor.command(EditorCommand::BeginGrab, &mut world, Some(Vec2::ZERO));
        editor.reset();
        assert!(editor.action().is_none());
        assert!(editor.selection().is_empty());
    }
}
