//! Distance-field primitives shared by terrain blocks
//!
//! These mirror the terrain fragment shader so CPU queries agree with what
//! is drawn on screen.

use glam::Vec2;

use crate::fract;

/// Signed distance to an axis-aligned box of half-extents `b` with corners
/// rounded by `r`. Negative inside.
#[inline]
pub fn sd_rounded_box(p: Vec2, b: Vec2, r: f32) -> f32 {
    let q = p.abs() - b + Vec2::splat(r);
    q.x.max(q.y).min(0.0) + q.max(Vec2::ZERO).length() - r
}

/// Circular-profile smooth minimum with blend radius `k`
///
/// Never exceeds `min(a, b)`; `k <= 0` is a plain minimum.
pub fn smooth_min(a: f32, b: f32, k: f32) -> f32 {
    if k <= 0.0 {
        return a.min(b);
    }
    let sqrt_half = std::f32::consts::FRAC_1_SQRT_2;
    let k = k / (1.0 - sqrt_half);
    let h = (k - (a - b).abs()).max(0.0) / k;
    let b2 = 13.0 / 4.0 - 4.0 * sqrt_half;
    let b3 = 3.0 / 4.0 - sqrt_half;
    a.min(b) - k * h * h * (h * b3 * (h - 4.0) + b2)
}

/// Per-cell gradient direction for `noise`
#[inline]
fn gradient(n: Vec2) -> Vec2 {
    let t = n.x * n.y;
    Vec2::new((t * 12.0 + 1.0).sin(), (t * 17.0 + 2.0).sin())
}

/// Coherent wave noise in [-1, 1]; `ofs` shifts the wave phase
pub fn noise(p: Vec2, ofs: f32) -> f32 {
    const FREQ: f32 = 2.0;
    let i = p.floor();
    let f = Vec2::new(fract(p.x), fract(p.y));
    let f = f * f * (Vec2::splat(3.0) - 2.0 * f);
    let wave = |corner: Vec2| (ofs + FREQ * p.dot(gradient(i + corner))).sin();

    let bottom = lerp(wave(Vec2::new(0.0, 0.0)), wave(Vec2::new(1.0, 0.0)), f.x);
    let top = lerp(wave(Vec2::new(0.0, 1.0)), wave(Vec2::new(1.0, 1.0)), f.x);
    lerp(bottom, top, f.y)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    (b - a) * t + a
}

/// Fraction of a quantity that survives `dt` seconds of decay with the
/// given half-life
#[inline]
pub fn half_life_keep(dt: f32, half_life: f32) -> f32 {
    0.5_f32.powf(dt / half_life)
}
