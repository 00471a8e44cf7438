//! Per-frame game context
//!
//! `Game` owns every piece of mutable state; the platform layer feeds it
//! input events and calls `frame` once per animation frame. Saves are not
//! sent from here: a document ready to go out waits in the outbox until the
//! platform layer takes it.

use glam::Vec2;

use crate::camera::Camera;
use crate::consts::MAX_FRAME_DT;
use crate::editor::{Editor, EditorCommand};
use crate::persistence::PersistError;
use crate::platform::Pointer;
use crate::renderer::{BlockParams, LineList, Vertex, pack_blocks};
use crate::settings::Settings;
use crate::sim::{Plankton, PlanktonInput, World};

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct Frame {
    /// Overlay line list in world space
    pub lines: Vec<Vertex>,
    /// Terrain shader block array
    pub blocks: Vec<BlockParams>,
    /// Column-major 4x4
    pub clip_from_world: [f32; 16],
    /// Column-major 3x2 affine
    pub world_from_clip: [f32; 6],
    pub time: f32,
}

pub struct Game {
    pub world: World,
    pub plankton: Plankton,
    pub camera: Camera,
    pub editor: Editor,
    pub pointer: Pointer,
    pub settings: Settings,
    outbox: Option<String>,
}

impl Game {
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self {
            world: World::new(),
            plankton: Plankton::new(),
            camera: Camera::new(settings.camera_radius),
            editor: Editor::new(settings.start_in_edit_mode, seed),
            pointer: Pointer::default(),
            settings,
            outbox: None,
        }
    }

    /// Advance by `elapsed` seconds and build the frame
    pub fn frame(&mut self, elapsed: f32, aspect: f32) -> Frame {
        let elapsed = elapsed.clamp(0.0, MAX_FRAME_DT);
        self.world.advance(elapsed);
        self.refresh_pointer();

        if self.editor.enabled() {
            self.editor.update(&mut self.world, self.pointer.world);
        } else {
            let input = PlanktonInput {
                target: self.pointer.world,
                wing_held: self.pointer.down,
            };
            self.plankton.update(elapsed, &input);
            self.camera.follow(
                self.plankton.pos,
                elapsed,
                self.settings.camera_follow_half_life,
                self.settings.camera_catch_up_time,
            );
        }

        if aspect.is_finite() && aspect > 0.0 {
            self.camera.aspect = aspect;
        }
        self.camera.update_bounds();

        self.build_frame()
    }

    fn refresh_pointer(&mut self) {
        self.pointer.world = self
            .pointer
            .normalized
            .map(|n| self.camera.world_from_normalized(n));
    }

    fn build_frame(&self) -> Frame {
        let mut lines = LineList::new();
        if self.settings.show_grid {
            lines.grid(self.camera.min(), self.camera.max(), self.settings.grid_step);
        }
        lines.axes();
        if self.editor.enabled() {
            lines.block_outlines(&self.world, &self.editor);
        }
        lines.plankton(&self.plankton);
        if let Some(at) = self.pointer.world {
            lines.cursor(at, self.pointer.down);
        }

        Frame {
            lines: lines.into_vertices(),
            blocks: pack_blocks(&self.world),
            clip_from_world: self.camera.clip_from_world().to_cols_array(),
            world_from_clip: self.camera.world_from_clip(),
            time: self.world.time(),
        }
    }

    /// Editing is locked until the startup load resolves
    fn edits_locked(&self) -> bool {
        self.world.is_pending()
    }

    pub fn command(&mut self, cmd: EditorCommand) {
        if self.edits_locked() && cmd != EditorCommand::ToggleEditMode {
            log::debug!("Ignoring {:?} while the world is loading", cmd);
            return;
        }
        let pointer = self.pointer.world;
        if self.editor.command(cmd, &mut self.world, pointer) {
            self.request_save();
        }
        if cmd == EditorCommand::ToggleEditMode {
            // Reopen in the mode the player left
            self.settings.start_in_edit_mode = self.editor.enabled();
            self.settings.save();
        }
    }

    pub fn pointer_moved(&mut self, normalized: Option<Vec2>) {
        self.pointer.moved(normalized);
        self.refresh_pointer();
    }

    pub fn pointer_down(&mut self, additive: bool) {
        self.pointer.pressed();
        if self.editor.enabled() && !self.edits_locked() {
            let pointer = self.pointer.world;
            if self.editor.click(&mut self.world, pointer, additive) {
                self.request_save();
            }
        }
    }

    pub fn pointer_up(&mut self) {
        self.pointer.released();
    }

    pub fn pointer_left(&mut self) {
        self.pointer.left();
    }

    fn request_save(&mut self) {
        if let Some(body) = self.world.request_save() {
            log::info!("Saving world ({} bytes)", body.len());
            self.outbox = Some(body);
        } else {
            log::debug!("Save already in flight, queued a retry");
        }
    }

    /// Document that should be sent now, if any
    pub fn take_save(&mut self) -> Option<String> {
        self.outbox.take()
    }

    pub fn finish_load(&mut self, result: Result<String, PersistError>) {
        self.world.finish_load(result);
        self.editor.reset();
    }

    pub fn finish_save(&mut self, result: Result<u16, PersistError>) {
        if let Some(body) = self.world.finish_save(result) {
            log::info!("Sending queued save ({} bytes)", body.len());
            self.outbox = Some(body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{SaveState, WorldDocument};

    fn loaded_game() -> Game {
        let mut game = Game::new(Settings::default(), 1);
        let json = WorldDocument::from_blocks(World::new().blocks()).to_json().unwrap();
        game.finish_load(Ok(json));
        game
    }

    #[test]
    fn test_frame_outputs() {
        let mut game = Game::new(Settings::default(), 1);
        let frame = game.frame(1.0 / 60.0, 1.5);
        assert_eq!(frame.blocks.len(), 4);
        assert!(!frame.lines.is_empty());
        assert_eq!(frame.lines.len() % 2, 0);
        assert!((frame.time - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_frame_clamps_long_stalls() {
        let mut game = Game::new(Settings::default(), 1);
        let frame = game.frame(5.0, 1.0);
        assert!((frame.time - MAX_FRAME_DT).abs() < 1e-6);
    }

    #[test]
    fn test_pointer_maps_to_world() {
        let mut game = Game::new(Settings::default(), 1);
        game.pointer_moved(Some(Vec2::splat(0.5)));
        assert_eq!(game.pointer.world, Some(game.camera.at));
        game.pointer_left();
        assert_eq!(game.pointer.world, None);
    }

    #[test]
    fn test_edits_locked_while_pending() {
        let mut game = Game::new(Settings::default(), 1);
        game.command(EditorCommand::ToggleEditMode);
        assert!(game.editor.enabled());
        game.command(EditorCommand::SelectAll);
        game.command(EditorCommand::Delete);
        assert_eq!(game.world.blocks().len(), 4);
        assert!(game.take_save().is_none());
    }

    #[test]
    fn test_edit_mode_toggle_persists_in_settings() {
        let mut game = loaded_game();
        game.command(EditorCommand::ToggleEditMode);
        assert!(game.settings.start_in_edit_mode);
        game.command(EditorCommand::ToggleEditMode);
        assert!(!game.settings.start_in_edit_mode);

        let mut game = Game::new(Settings { start_in_edit_mode: true, ..Settings::default() }, 1);
        assert!(game.editor.enabled());
        game.command(EditorCommand::ToggleEditMode);
        assert!(!game.settings.start_in_edit_mode);
    }

    #[test]
    fn test_edit_mode_freezes_plankton() {
        let mut game = loaded_game();
        game.command(EditorCommand::ToggleEditMode);
        let before = game.plankton.clone();
        game.frame(0.05, 1.0);
        assert_eq!(game.plankton, before);
    }

    #[test]
    fn test_save_burst_through_outbox() {
        let mut game = loaded_game();
        game.command(EditorCommand::ToggleEditMode);
        game.command(EditorCommand::SelectAll);
        game.command(EditorCommand::RandomizeSeed);
        let first = game.take_save();
        assert!(first.is_some());

        game.command(EditorCommand::CycleMode);
        game.command(EditorCommand::RandomizeSeed);
        assert!(game.take_save().is_none());
        assert_eq!(game.world.save_state(), SaveState::InFlightWithPendingRetry);

        game.finish_save(Ok(200));
        let trailing = game.take_save().unwrap();
        let doc = WorldDocument::from_json(&trailing).unwrap();
        assert_eq!(doc, game.world.document());

        game.finish_save(Ok(200));
        assert!(game.take_save().is_none());
        assert_eq!(game.world.save_state(), SaveState::Idle);
    }

    #[test]
    fn test_click_commits_grab_and_saves() {
        let mut game = loaded_game();
        game.command(EditorCommand::ToggleEditMode);
        game.command(EditorCommand::SelectAll);
        game.pointer_moved(Some(Vec2::splat(0.5)));
        game.command(EditorCommand::BeginGrab);
        assert!(game.editor.action().is_some());

        game.pointer_moved(Some(Vec2::new(0.6, 0.5)));
        game.frame(1.0 / 60.0, 1.0);
        game.pointer_down(false);
        assert!(game.editor.action().is_none());
        assert!(game.take_save().is_some());
    }

    #[test]
    fn test_reload_resets_editor() {
        let mut game = loaded_game();
        game.command(EditorCommand::ToggleEditMode);
        game.command(EditorCommand::SelectAll);
        game.finish_load(Err(PersistError::Status(404)));
        assert!(game.editor.selection().is_empty());
    }
}
