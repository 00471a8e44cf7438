//! Plankton flight model
//!
//! Fixed-timestep integrator blending two flight regimes by the wing
//! actuator: "blob" (velocity simply bleeds away) and "wing" (velocity
//! along the heading is kept, sideways velocity is redirected away, unless
//! the plankton is too slow and stalls).

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::sdf::{half_life_keep, lerp};
use crate::consts::{RECOVERY_POINT, TICK};

/// Exponential heading smoothing half-life (s)
pub const TURN_HALF_LIFE: f32 = 0.5;
/// Maximum turn rate after smoothing (rad/s)
pub const TURN_RATE: f32 = TAU / 0.5;

/// Seconds for the wing to fully open while the button is held
pub const WING_OPEN_TIME: f32 = 0.1;
/// Seconds for the wing to fully close after release
pub const WING_CLOSE_TIME: f32 = 0.05;

pub const GRAVITY: f32 = 10.0;

pub const HALF_LIFE_PERP_WING: f32 = 0.04;
pub const HALF_LIFE_PERP_WING_STALL: f32 = 0.2;
pub const HALF_LIFE_ALONG_FORWARD_WING: f32 = 10.0;
pub const HALF_LIFE_ALONG_BACKWARD_WING: f32 = 0.5;
pub const HALF_LIFE_BLOB: f32 = 0.2;

/// Fully stalled at or below this airspeed
pub const MIN_STALL_AIRSPEED: f32 = 3.0;
/// No stall at or above this airspeed
pub const MAX_STALL_AIRSPEED: f32 = 4.0;

/// Per-tick control input
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanktonInput {
    /// Pointer position in world space, if the pointer is over the canvas
    pub target: Option<Vec2>,
    /// Pointer button held: open the wing
    pub wing_held: bool,
}

/// The player creature
#[derive(Debug, Clone, PartialEq)]
pub struct Plankton {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading (radians)
    pub angle: f32,
    /// Wing actuator in [0, 1]; 0 = blob, 1 = wing
    pub wing: f32,
    /// Leftover simulation time (s)
    pub acc: f32,
}

impl Default for Plankton {
    fn default() -> Self {
        Self::new()
    }
}

/// Stall factor: 1 at or below `MIN_STALL_AIRSPEED`, 0 at or above
/// `MAX_STALL_AIRSPEED`, linear in between
pub fn stall_factor(airspeed: f32) -> f32 {
    if airspeed < MIN_STALL_AIRSPEED {
        1.0
    } else if airspeed > MAX_STALL_AIRSPEED {
        0.0
    } else {
        (airspeed - MAX_STALL_AIRSPEED) / (MIN_STALL_AIRSPEED - MAX_STALL_AIRSPEED)
    }
}

impl Plankton {
    pub fn new() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            angle: 0.0,
            wing: 0.0,
            acc: 0.0,
        }
    }

    /// Unit vector along the heading
    pub fn heading(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    /// Run whole ticks covering `elapsed` seconds (callers clamp `elapsed`)
    pub fn update(&mut self, elapsed: f32, input: &PlanktonInput) {
        self.acc += elapsed;
        while self.acc > 0.0 {
            self.tick(input);
            self.acc -= TICK;
        }
    }

    /// Advance by one fixed `TICK`
    pub fn tick(&mut self, input: &PlanktonInput) {
        let to_target = input
            .target
            .map(|t| t - self.pos)
            .unwrap_or(Vec2::Y);
        let target_angle = to_target.y.atan2(to_target.x);

        if input.wing_held {
            self.wing = (self.wing + TICK / WING_OPEN_TIME).min(1.0);
        } else {
            self.wing = (self.wing - TICK / WING_CLOSE_TIME).max(0.0);
        }

        self.steer(target_angle);

        let dir = self.heading();
        self.vel.y -= GRAVITY * TICK;

        let along = self.vel.dot(dir);
        let perp = self.vel.dot(dir.perp());

        // Wing regime
        let along_wing = if along > 0.0 {
            along * half_life_keep(TICK, HALF_LIFE_ALONG_FORWARD_WING)
        } else {
            along * half_life_keep(TICK, HALF_LIFE_ALONG_BACKWARD_WING)
        };
        let stall = stall_factor(along);
        let half_life_perp = lerp(HALF_LIFE_PERP_WING, HALF_LIFE_PERP_WING_STALL, stall);
        let perp_wing = perp * half_life_keep(TICK, half_life_perp);

        // Blob regime
        let blob_keep = half_life_keep(TICK, HALF_LIFE_BLOB);
        let along_blob = along * blob_keep;
        let perp_blob = perp * blob_keep;

        let along = lerp(along_blob, along_wing, self.wing);
        let perp = lerp(perp_blob, perp_wing, self.wing);
        self.vel = dir * along + dir.perp() * perp;

        self.pos += self.vel * TICK;

        if self.pos.y < 0.0 {
            log::debug!("Plankton fell below the floor, recovering");
            self.pos = Vec2::from(RECOVERY_POINT);
            self.vel = Vec2::ZERO;
        }
    }

    /// Turn toward `target_angle`: exponential smoothing, then the
    /// remaining error clamped by the turn rate
    fn steer(&mut self, target_angle: f32) {
        let mut turn = (target_angle - self.angle) % TAU;
        if turn < -PI {
            turn += TAU;
        }
        if turn > PI {
            turn -= TAU;
        }

        let smoothed = (1.0 - half_life_keep(TICK, TURN_HALF_LIFE)) * turn;
        turn -= smoothed;
        self.angle += smoothed;

        let max_step = TURN_RATE * TICK;
        self.angle += turn.clamp(-max_step, max_step);
        self.angle %= TAU;
    }

    /// Outline points (closed loop) for overlay drawing
    pub fn outline(&self, segments: usize) -> Vec<Vec2> {
        let dir = self.heading();
        let squash = lerp(1.0, 0.2, self.wing);
        (0..=segments)
            .map(|i| {
                let d = Vec2::from_angle(i as f32 / segments as f32 * TAU);
                let d = Vec2::new(d.x, d.y * squash);
                self.pos + dir * d.x + dir.perp() * d.y
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn airborne() -> Plankton {
        Plankton {
            pos: Vec2::new(0.0, 50.0),
            ..Plankton::new()
        }
    }

    fn wrap(a: f32) -> f32 {
        crate::normalize_angle(a)
    }

    #[test]
    fn test_floor_recovery() {
        for x in [-7.0, 0.0, 3.5] {
            let mut p = Plankton {
                pos: Vec2::new(x, -0.1),
                ..Plankton::new()
            };
            p.tick(&PlanktonInput::default());
            assert_eq!(p.pos, Vec2::new(10.0, 10.0));
            assert_eq!(p.vel, Vec2::ZERO);
        }
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut p = airborne();
        p.tick(&PlanktonInput::default());
        assert!(p.vel.y < 0.0);
        assert!(p.pos.y < 50.0);
    }

    #[test]
    fn test_wing_ramps() {
        let mut p = airborne();
        let held = PlanktonInput {
            target: None,
            wing_held: true,
        };
        for _ in 0..6 {
            p.tick(&held);
        }
        assert!((p.wing - 1.0).abs() < 1e-4);
        p.tick(&held);
        assert_eq!(p.wing, 1.0);

        for _ in 0..4 {
            p.tick(&PlanktonInput::default());
        }
        assert_eq!(p.wing, 0.0);
    }

    #[test]
    fn test_no_target_points_up() {
        let mut p = airborne();
        for _ in 0..600 {
            p.tick(&PlanktonInput::default());
        }
        assert!((wrap(p.angle) - PI / 2.0).abs() < 1e-2);
    }

    #[test]
    fn test_update_ticks_per_elapsed() {
        let mut p = airborne();
        p.update(0.0, &PlanktonInput::default());
        assert_eq!(p.pos, Vec2::new(0.0, 50.0));

        p.update(0.04, &PlanktonInput::default());
        // Ticks until the accumulator is no longer positive
        assert!(p.acc <= 0.0);
        assert!(p.acc > -TICK);
    }

    #[test]
    fn test_stall_factor() {
        assert_eq!(stall_factor(0.0), 1.0);
        assert_eq!(stall_factor(5.0), 0.0);
        assert!((stall_factor(3.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_wing_keeps_forward_speed() {
        let mut wing = airborne();
        wing.vel = Vec2::new(8.0, 0.0);
        wing.wing = 1.0;
        let mut blob = wing.clone();
        blob.wing = 0.0;

        let target = Some(Vec2::new(1000.0, 50.0));
        wing.tick(&PlanktonInput { target, wing_held: true });
        blob.tick(&PlanktonInput { target, wing_held: false });
        assert!(wing.vel.x > blob.vel.x);
    }

    proptest! {
        #[test]
        fn wing_stays_in_unit_range(inputs in prop::collection::vec(any::<bool>(), 1..200)) {
            let mut p = airborne();
            for held in inputs {
                p.tick(&PlanktonInput { target: None, wing_held: held });
                prop_assert!((0.0..=1.0).contains(&p.wing));
            }
        }

        #[test]
        fn heading_turns_toward_target(
            start in -PI..PI,
            delta in -3.1f32..3.1,
        ) {
            let mut p = airborne();
            p.angle = start;
            let target_angle = start + delta;
            let target = p.pos + Vec2::from_angle(target_angle) * 5.0;
            p.tick(&PlanktonInput { target: Some(target), wing_held: false });

            let change = wrap(p.angle - start);
            let exp_term = (1.0 - half_life_keep(TICK, TURN_HALF_LIFE)) * delta.abs();
            prop_assert!(change.abs() <= TURN_RATE * TICK + exp_term + 1e-4);
            // Moves toward the target, never past it
            prop_assert!(change * delta >= -1e-6);
            prop_assert!(change.abs() <= delta.abs() + 1e-4);
        }
    }
}
