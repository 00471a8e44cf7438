//! Pointer state and keyboard decoding
//!
//! Raw browser events are turned into `Pointer` updates and semantic
//! `EditorCommand`s here; nothing downstream sees device events.

use glam::Vec2;

use crate::editor::EditorCommand;

/// Pointer state shared by the editor and the flight model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pointer {
    /// Position in [0,1]² (y up), `None` when off the canvas
    pub normalized: Option<Vec2>,
    /// Same position in world space, refreshed every frame
    pub world: Option<Vec2>,
    /// Button currently held
    pub down: bool,
}

impl Pointer {
    /// Client coordinates relative to a canvas rect into [0,1]² (y up)
    pub fn normalize(client: Vec2, rect_min: Vec2, rect_size: Vec2) -> Option<Vec2> {
        if rect_size.x <= 0.0 || rect_size.y <= 0.0 {
            return None;
        }
        let rel = (client - rect_min) / rect_size;
        Some(Vec2::new(rel.x, 1.0 - rel.y))
    }

    pub fn moved(&mut self, normalized: Option<Vec2>) {
        self.normalized = normalized;
    }

    pub fn pressed(&mut self) {
        self.down = true;
    }

    pub fn released(&mut self) {
        self.down = false;
    }

    /// Pointer left the canvas (touch ended)
    pub fn left(&mut self) {
        self.down = false;
        self.normalized = None;
        self.world = None;
    }
}

/// Map a `KeyboardEvent.code` to an editor command
pub fn command_for_key(code: &str, shift: bool) -> Option<EditorCommand> {
    let command = match code {
        "Tab" => EditorCommand::ToggleEditMode,
        "KeyA" => EditorCommand::SelectAll,
        "KeyD" if shift => EditorCommand::Duplicate,
        "KeyX" | "Delete" => EditorCommand::Delete,
        "KeyG" => EditorCommand::BeginGrab,
        "KeyR" => EditorCommand::BeginRotate,
        "KeyS" => EditorCommand::BeginResize { round: shift },
        "Escape" => EditorCommand::Cancel,
        "Space" => EditorCommand::CyclePick,
        "KeyN" => EditorCommand::RandomizeSeed,
        "KeyM" => EditorCommand::CycleMode,
        _ => return None,
    };
    Some(command)
}
