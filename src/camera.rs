//! Follow camera and world/clip transforms

use glam::{Mat4, Vec2, Vec3};

use crate::sim::sdf::half_life_keep;

/// 2D camera showing a square of `radius` around `at`, widened along the
/// longer screen axis
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub at: Vec2,
    pub radius: f32,
    /// Width / height of the canvas
    pub aspect: f32,
    min: Vec2,
    max: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl Camera {
    pub fn new(radius: f32) -> Self {
        let mut camera = Self {
            at: Vec2::new(0.0, 2.5),
            radius,
            aspect: 1.0,
            min: Vec2::ZERO,
            max: Vec2::ZERO,
        };
        camera.update_bounds();
        camera
    }

    /// Half-size of the visible region
    fn half_extent(&self) -> Vec2 {
        Vec2::new(
            self.radius * self.aspect.max(1.0),
            self.radius * (1.0 / self.aspect).max(1.0),
        )
    }

    /// Recompute the visible bounds after moving or resizing
    pub fn update_bounds(&mut self) {
        let half = self.half_extent();
        self.min = self.at - half;
        self.max = self.at + half;
    }

    pub fn min(&self) -> Vec2 {
        self.min
    }

    pub fn max(&self) -> Vec2 {
        self.max
    }

    /// Pointer in [0,1]² (y up) to world space
    pub fn world_from_normalized(&self, normalized: Vec2) -> Vec2 {
        normalized * (self.max - self.min) + self.min
    }

    /// Column-major clip-from-world matrix for the overlay shader
    pub fn clip_from_world(&self) -> Mat4 {
        let half = self.half_extent();
        let scale = Vec2::new(1.0 / half.x, 1.0 / half.y);
        Mat4::from_scale(scale.extend(1.0)) * Mat4::from_translation((-self.at).extend(0.0))
    }

    /// Column-major 3x2 affine taking clip coordinates to world space
    pub fn world_from_clip(&self) -> [f32; 6] {
        let half = 0.5 * (self.max - self.min);
        let center = 0.5 * (self.max + self.min);
        [half.x, 0.0, 0.0, half.y, center.x, center.y]
    }

    /// Ease toward `target`: a half-life blend plus a catch-up term so the
    /// target never drifts off screen
    pub fn follow(&mut self, target: Vec2, elapsed: f32, half_life: f32, catch_up_time: f32) {
        let keep = half_life_keep(elapsed, half_life);
        self.at += (target - self.at) * (1.0 - keep);

        let to = target - self.at;
        let keep = (keep - elapsed / catch_up_time).max(0.0);
        self.at += to * (1.0 - keep);
    }

    /// Project a world point into clip space
    #[cfg(test)]
    fn project(&self, world: Vec2) -> Vec2 {
        let p = self.clip_from_world().transform_point3(Vec3::new(world.x, world.y, 0.0));
        Vec2::new(p.x, p.y)
    }
}
