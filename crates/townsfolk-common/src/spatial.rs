//! Heading and direction helpers for NPCs moving in world space.
//!
//! Positions are `glam::Vec3` with +Y up. Headings are yaw angles in degrees
//! around the Y axis: 0 faces +Z, 90 faces +X.

use glam::Vec3;

/// Directions shorter than this are treated as "no direction".
pub const DIRECTION_EPSILON: f32 = 1e-4;

/// Wraps an angle into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed shortest rotation from `from` to `to`, in `(-180, 180]`.
#[must_use]
pub fn delta_degrees(from: f32, to: f32) -> f32 {
    let d = (to - from).rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Yaw that faces from `from` towards `to` on the horizontal plane.
///
/// Returns `None` when the two points are vertically aligned.
#[must_use]
pub fn yaw_towards(from: Vec3, to: Vec3) -> Option<f32> {
    let dx = to.x - from.x;
    let dz = to.z - from.z;
    if dx.abs() < DIRECTION_EPSILON && dz.abs() < DIRECTION_EPSILON {
        return None;
    }
    Some(normalize_degrees(dx.atan2(dz).to_degrees()))
}

/// Rotates `current` towards `target` by at most `max_delta` degrees.
#[must_use]
pub fn rotate_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let max_delta = max_delta.max(0.0);
    let delta = delta_degrees(current, target);
    if delta.abs() <= max_delta {
        normalize_degrees(target)
    } else {
        normalize_degrees(current + max_delta * delta.signum())
    }
}

/// Unit vector from `from` to `to`, or zero if they coincide.
#[must_use]
pub fn direction_to(from: Vec3, to: Vec3) -> Vec3 {
    (to - from).normalize_or_zero()
}
