//! Overlay line list builder
//!
//! Everything here is emitted as vertex pairs in world space; the overlay
//! shader applies `clip_from_world`.

use glam::Vec2;

use super::vertex::{Vertex, colors};
use crate::editor::Editor;
use crate::sim::{Plankton, World};

/// Segments used for the plankton ellipse
const PLANKTON_SEGMENTS: usize = 32;
/// Half-size of the pointer cross
const CURSOR_SIZE: f32 = 0.5;
/// More grid lines than this in one frame means the step is degenerate
const MAX_GRID_LINES: usize = 4096;
/// Half-size of the pressed-button square
const CURSOR_PRESSED_SIZE: f32 = 0.25;

#[derive(Debug, Clone, Default)]
pub struct LineList {
    vertices: Vec<Vertex>,
}

impl LineList {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<Vertex> {
        self.vertices
    }

    pub fn segment(&mut self, a: Vec2, b: Vec2, color: [f32; 4]) {
        self.vertices.push(Vertex::at(a, color));
        self.vertices.push(Vertex::at(b, color));
    }

    /// Consecutive segments through `points`
    pub fn polyline(&mut self, points: &[Vec2], color: [f32; 4]) {
        for pair in points.windows(2) {
            self.segment(pair[0], pair[1], color);
        }
    }

    /// Closed loop through `points`
    pub fn polygon(&mut self, points: &[Vec2], color: [f32; 4]) {
        self.polyline(points, color);
        if let (Some(&last), Some(&first)) = (points.last(), points.first()) {
            self.segment(last, first, color);
        }
    }

    /// Background grid covering `[min, max]`, one line past each edge; the
    /// y = 0 line stands out
    pub fn grid(&mut self, min: Vec2, max: Vec2, step: f32) {
        if step.is_nan() || step <= 0.0 {
            return;
        }
        let first = (min / step).floor();
        let last = (max / step).ceil();
        let lines = (last - first + Vec2::ONE).max(Vec2::ZERO);
        if lines.x + lines.y > MAX_GRID_LINES as f32 {
            log::warn!("Grid step {} is too fine for the view, skipping grid", step);
            return;
        }

        for i in first.x as i32..=last.x as i32 {
            let x = i as f32 * step;
            self.segment(Vec2::new(x, min.y), Vec2::new(x, max.y), colors::GRID);
        }
        for i in first.y as i32..=last.y as i32 {
            let y = i as f32 * step;
            let color = if i == 0 { colors::HORIZON } else { colors::GRID };
            self.segment(Vec2::new(min.x, y), Vec2::new(max.x, y), color);
        }
    }

    /// Unit world axes at the origin
    pub fn axes(&mut self) {
        self.segment(Vec2::ZERO, Vec2::X, colors::AXIS_X);
        self.segment(Vec2::ZERO, Vec2::Y, colors::AXIS_Y);
    }

    pub fn cursor(&mut self, at: Vec2, pressed: bool) {
        let s = CURSOR_SIZE;
        self.segment(at + Vec2::new(-s, -s), at + Vec2::new(s, s), colors::CURSOR);
        self.segment(at + Vec2::new(-s, s), at + Vec2::new(s, -s), colors::CURSOR);
        if pressed {
            let s = CURSOR_PRESSED_SIZE;
            self.polygon(
                &[
                    at + Vec2::new(-s, -s),
                    at + Vec2::new(s, -s),
                    at + Vec2::new(s, s),
                    at + Vec2::new(-s, s),
                ],
                colors::CURSOR,
            );
        }
    }

    /// Box outline of every block, colored by selection and hover
    pub fn block_outlines(&mut self, world: &World, editor: &Editor) {
        for block in world.blocks() {
            let mut color = if editor.selection().contains(block.id()) {
                colors::BLOCK_SELECTED
            } else {
                colors::BLOCK
            };
            if editor.hovered() == Some(block.id()) {
                color = colors::hovered(color);
            }
            self.polygon(&block.corners(), color);
        }
    }

    pub fn plankton(&mut self, plankton: &Plankton) {
        self.polyline(&plankton.outline(PLANKTON_SEGMENTS), colors::PLANKTON);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_closes() {
        let mut lines = LineList::new();
        lines.polygon(&[Vec2::ZERO, Vec2::X, Vec2::Y], colors::GRID);
        assert_eq!(lines.vertices().len(), 6);
        assert_eq!(lines.vertices()[5].position, [0.0, 0.0]);
    }

    #[test]
    fn test_grid_highlights_horizon() {
        let mut lines = LineList::new();
        lines.grid(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0), 0.75);
        // Lines at -1.5, -0.75, 0, 0.75, 1.5 on each axis
        assert_eq!(lines.vertices().len(), 20);
        let horizon: Vec<_> = lines
            .vertices()
            .iter()
            .filter(|v| v.color == colors::HORIZON)
            .collect();
        assert_eq!(horizon.len(), 2);
        assert!(horizon.iter().all(|v| v.position[1] == 0.0));
    }

    #[test]
    fn test_degenerate_grid_step_skipped() {
        let mut lines = LineList::new();
        lines.grid(Vec2::splat(-10.0), Vec2::splat(10.0), 1e-6);
        lines.grid(Vec2::splat(-10.0), Vec2::splat(10.0), f32::NAN);
        assert!(lines.vertices().is_empty());
    }

    #[test]
    fn test_cursor_is_diagonal_cross() {
        let mut lines = LineList::new();
        lines.cursor(Vec2::new(1.0, 1.0), false);
        let ends: Vec<[f32; 2]> = lines.vertices().iter().map(|v| v.position).collect();
        assert_eq!(ends, vec![[0.5, 0.5], [1.5, 1.5], [0.5, 1.5], [1.5, 0.5]]);
    }

    #[test]
    fn test_cursor_square_when_pressed() {
        let mut up = LineList::new();
        up.cursor(Vec2::ZERO, false);
        let mut down = LineList::new();
        down.cursor(Vec2::ZERO, true);
        assert_eq!(up.vertices().len(), 4);
        assert_eq!(down.vertices().len(), 12);
    }

    #[test]
    fn test_plankton_loop() {
        let mut lines = LineList::new();
        lines.plankton(&Plankton::new());
        assert_eq!(lines.vertices().len(), PLANKTON_SEGMENTS * 2);
    }
}
