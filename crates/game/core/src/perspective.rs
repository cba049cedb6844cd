//! Perspective correction between logical and visual space.
//!
//! The camera is tilted 30°, so the rendered ("visual") vertical axis is the
//! logical one compressed by `tan(30°) ≈ 0.57735`. Gameplay ranges, angles and
//! hit tests are all evaluated in logical space; positions and velocities
//! that get rendered live in visual space.
//!
//! ```text
//! logical (x, y)  ──squash──▶  visual (x, y · VERTICAL_SCALE)
//! visual  (x, y)  ─unsquash─▶  logical (x, y / VERTICAL_SCALE)
//! ```
//!
//! Every function here is pure.

use core::f32::consts::{PI, TAU};

use glam::Vec2;

/// Visual compression of the vertical axis (`1 / √3`).
pub const VERTICAL_SCALE: f32 = 0.577_350_26;

/// `1 / VERTICAL_SCALE²`, kept exact so the horizontal factor is exactly 1.
pub const INV_VERTICAL_SCALE_SQ: f32 = 3.0;

/// Multiplier turning a logical travel distance into visual distance along a
/// visual unit direction `d`: `1 / sqrt(dx² + 3·dy²)`.
///
/// Returns 1.0 for a degenerate (zero) direction.
pub fn visual_scale_factor(direction: Vec2) -> f32 {
    let denom = (direction.x * direction.x
        + INV_VERTICAL_SCALE_SQ * direction.y * direction.y)
        .sqrt();
    if denom <= f32::EPSILON {
        return 1.0;
    }
    1.0 / denom
}

/// Visual → logical (undo the vertical compression).
#[inline]
pub fn to_logical(visual: Vec2) -> Vec2 {
    Vec2::new(visual.x, visual.y / VERTICAL_SCALE)
}

/// Logical → visual (apply the vertical compression).
#[inline]
pub fn to_visual(logical: Vec2) -> Vec2 {
    Vec2::new(logical.x, logical.y * VERTICAL_SCALE)
}

/// Undistorted angle (radians) of a visual-space direction.
///
/// Use this wherever a visual vector is rotated or angle-compared; taking
/// `atan2` of the raw visual vector skews rotating shapes.
pub fn logical_angle(visual_dir: Vec2) -> f32 {
    (visual_dir.y / VERTICAL_SCALE).atan2(visual_dir.x)
}

/// Visual unit direction for a logical angle (radians).
pub fn visual_direction(logical_angle: f32) -> Vec2 {
    to_visual(Vec2::from_angle(logical_angle)).normalize_or_zero()
}

/// Visual displacement that covers `logical_distance` along `visual_dir`.
pub fn visual_step(visual_dir: Vec2, logical_distance: f32) -> Vec2 {
    let dir = visual_dir.normalize_or_zero();
    dir * logical_distance * visual_scale_factor(dir)
}

/// Squared logical distance between two visual positions.
pub fn logical_distance_sq(a: Vec2, b: Vec2) -> f32 {
    to_logical(b - a).length_squared()
}

/// Elliptical containment: is `point` within `radius` logical units of `center`?
pub fn in_ellipse(center: Vec2, point: Vec2, radius: f32) -> bool {
    let radius = radius.max(0.0);
    logical_distance_sq(center, point) <= radius * radius
}

/// Cone containment in logical space.
///
/// `aim` is a visual direction; `cone_angle` is the full opening (radians).
pub fn in_cone(origin: Vec2, aim: Vec2, point: Vec2, range: f32, cone_angle: f32) -> bool {
    let offset = to_logical(point - origin);
    let range = range.max(0.0);
    let dist_sq = offset.length_squared();
    if dist_sq > range * range {
        return false;
    }
    if dist_sq <= f32::EPSILON {
        return true;
    }
    let diff = wrap_angle(offset.y.atan2(offset.x) - logical_angle(aim));
    diff.abs() <= cone_angle.max(0.0) * 0.5
}

/// Wraps an angle into `(-π, π]`.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}
