//! Falling-note trajectory math
//!
//! Notes fall straight down in progress terms while drifting horizontally
//! toward a single impact point, so the danger zone near the base stays
//! visually narrow.

use glam::Vec2;

use crate::consts::{BASE_PROGRESS, TARGET_X};

/// Horizontal position for a note that spawned at `spawn_x` and has fallen
/// to `progress`. Quadratic ease-in: spread out at the top, funneled at the
/// base.
#[inline]
pub fn drift_x(spawn_x: f32, progress: f32) -> f32 {
    let t = (progress / BASE_PROGRESS).max(0.0);
    spawn_x + (TARGET_X - spawn_x) * t * t
}

/// Full field position (x drifts, y is the vertical progress itself)
#[inline]
pub fn position(spawn_x: f32, progress: f32) -> Vec2 {
    Vec2::new(drift_x(spawn_x, progress), progress)
}
