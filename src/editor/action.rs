//! Reversible gesture actions
//!
//! An action snapshots its targets when the gesture starts, rewrites their
//! live fields from that snapshot on every pointer update, and either
//! commits (snapshot dropped) or cancels (snapshot restored).

use glam::Vec2;

use crate::normalize_angle;
use crate::sim::{BlockId, World};

/// Pre-gesture state of one target
#[derive(Debug, Clone, Copy, PartialEq)]
struct Snapshot {
    id: BlockId,
    at: Vec2,
    angle: f32,
    radii: Vec2,
    round: f32,
}

/// Shared gesture bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    /// Pointer position when the gesture began
    start: Vec2,
    /// Centroid of the targets' starting positions
    pivot: Vec2,
    targets: Vec<Snapshot>,
}

impl Gesture {
    fn capture(world: &World, ids: &[BlockId], pointer: Vec2) -> Option<Self> {
        let targets: Vec<Snapshot> = ids
            .iter()
            .filter_map(|&id| world.block(id))
            .map(|b| Snapshot {
                id: b.id(),
                at: b.at(),
                angle: b.angle(),
                radii: b.radii(),
                round: b.round(),
            })
            .collect();
        if targets.is_empty() {
            return None;
        }
        let pivot = targets.iter().map(|s| s.at).sum::<Vec2>() / targets.len() as f32;
        Some(Self {
            start: pointer,
            pivot,
            targets,
        })
    }
}

/// Which gesture a new action performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Grab,
    Rotate,
    /// Resize half-extents, or corner rounding when `round` is set
    Resize { round: bool },
}

/// A live editor gesture
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Grab(Gesture),
    Rotate(Gesture),
    Resize { gesture: Gesture, round: bool },
}

impl Action {
    /// Start a gesture on `ids`; `None` if none of them exist
    pub fn begin(kind: ActionKind, world: &World, ids: &[BlockId], pointer: Vec2) -> Option<Self> {
        let gesture = Gesture::capture(world, ids, pointer)?;
        Some(match kind {
            ActionKind::Grab => Action::Grab(gesture),
            ActionKind::Rotate => Action::Rotate(gesture),
            ActionKind::Resize { round } => Action::Resize { gesture, round },
        })
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Grab(_) => ActionKind::Grab,
            Action::Rotate(_) => ActionKind::Rotate,
            Action::Resize { round, .. } => ActionKind::Resize { round: *round },
        }
    }

    fn gesture(&self) -> &Gesture {
        match self {
            Action::Grab(g) | Action::Rotate(g) => g,
            Action::Resize { gesture, .. } => gesture,
        }
    }

    /// Blocks this action is moving
    pub fn targets(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.gesture().targets.iter().map(|s| s.id)
    }

    /// Recompute every target from its snapshot and the pointer
    pub fn update(&self, world: &mut World, pointer: Vec2) {
        let g = self.gesture();
        for snap in &g.targets {
            let Some(block) = world.block_mut(snap.id) else {
                continue;
            };
            match self {
                Action::Grab(_) => {
                    block.set_at(snap.at + (pointer - g.start));
                }
                Action::Rotate(_) => {
                    let from = g.start - g.pivot;
                    let to = pointer - g.pivot;
                    let delta = to.y.atan2(to.x) - from.y.atan2(from.x);
                    let rot = Vec2::from_angle(delta);
                    block.set_at(g.pivot + rot.rotate(snap.at - g.pivot));
                    block.set_angle(normalize_angle(snap.angle + delta));
                }
                Action::Resize { round, .. } => {
                    let delta = (pointer - g.pivot).length() - (g.start - g.pivot).length();
                    if *round {
                        block.set_round(snap.round + delta);
                    } else {
                        block.set_radii(snap.radii + Vec2::splat(delta));
                    }
                }
            }
        }
    }

    /// Put every target back exactly as it was
    pub fn cancel(self, world: &mut World) {
        for snap in &self.gesture().targets {
            if let Some(block) = world.block_mut(snap.id) {
                block.set_at(snap.at);
                block.set_angle(snap.angle);
                block.set_radii(snap.radii);
                block.set_round(snap.round);
            }
        }
    }

    /// Apply the final pointer position and drop the snapshot
    pub fn commit(self, world: &mut World, pointer: Vec2) {
        self.update(world, pointer);
    }
}
