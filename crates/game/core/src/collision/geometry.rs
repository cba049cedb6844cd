//! Narrow-phase tests. Inputs are visual-space points; every test unsquashes
//! into logical space before measuring, so radii and angles are undistorted.

use core::f32::consts::TAU;

use glam::Vec2;

use crate::perspective::{logical_distance_sq, to_logical};

/// Swept circle vs. circle.
///
/// Moves a circle of combined radius `radius` from `from` to `to` and returns
/// the entry fraction `t ∈ [0, 1]` at which it first touches `center`, or
/// `None` if the path misses. Starting inside reports `Some(0.0)`.
pub fn segment_circle_toi(from: Vec2, to: Vec2, center: Vec2, radius: f32) -> Option<f32> {
    let p0 = to_logical(from);
    let d = to_logical(to) - p0;
    let m = p0 - to_logical(center);
    let r = radius.max(0.0);

    let c = m.dot(m) - r * r;
    if c <= 0.0 {
        return Some(0.0);
    }

    let a = d.dot(d);
    if a <= f32::EPSILON {
        return None;
    }

    let b = m.dot(d);
    if b > 0.0 {
        // Moving away from the center.
        return None;
    }

    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }

    let t = (-b - disc.sqrt()) / a;
    (t <= 1.0).then_some(t.max(0.0))
}

/// Static circle vs. circle. Returns the logical distance between centers on
/// overlap (used to order candidates).
pub fn circle_overlap(center: Vec2, radius: f32, other: Vec2, other_radius: f32) -> Option<f32> {
    let reach = (radius + other_radius).max(0.0);
    let dist_sq = logical_distance_sq(center, other);
    (dist_sq <= reach * reach).then(|| dist_sq.sqrt())
}

/// Blade sweep vs. circle.
///
/// The blade is a segment of length `reach` and half-thickness `thickness`
/// pivoting around `pivot`; during the tick it rotates from `from_angle`
/// (logical radians) by the signed `sweep`. When the swept wedge touches the
/// target, returns how far (radians, along the sweep) the blade had turned
/// when contact began. Targets already under the blade report `0.0` or less.
pub fn arc_overlap(
    pivot: Vec2,
    reach: f32,
    thickness: f32,
    from_angle: f32,
    sweep: f32,
    target: Vec2,
    target_radius: f32,
) -> Option<f32> {
    let offset = to_logical(target - pivot);
    let dist = offset.length();
    let pad_radius = (thickness + target_radius).max(0.0);

    if dist > reach.max(0.0) + target_radius.max(0.0) {
        return None;
    }
    if dist <= pad_radius {
        return Some(0.0);
    }

    // Angular half-width the target (plus blade thickness) subtends.
    let pad = (pad_radius / dist).min(1.0).asin();
    let sign = if sweep < 0.0 { -1.0 } else { 1.0 };
    let target_angle = logical_angle_of(offset);
    let rel = (sign * (target_angle - from_angle)).rem_euclid(TAU);

    if rel >= TAU - pad {
        return Some(rel - TAU);
    }
    (rel <= sweep.abs() + pad).then_some(rel - pad)
}

#[inline]
fn logical_angle_of(logical: Vec2) -> f32 {
    logical.y.atan2(logical.x)
}
