//! Small vector helpers shared by the locomotion controllers and the agent.
//!
//! Everything works on raylib's [`Vector2`] in screen space (+y down). The
//! "horizontal" control axis under an arbitrary gravity direction is the
//! [`perpendicular`] of that direction, chosen so that default gravity
//! `(0, 1)` yields `(1, 0)`.

use raylib::prelude::Vector2;

/// Below this length a vector is treated as zero.
pub const VECTOR_EPSILON: f32 = 1e-6;

/// Default gravity direction ("down" in screen space).
pub fn down() -> Vector2 {
    Vector2::new(0.0, 1.0)
}

pub fn dot(a: Vector2, b: Vector2) -> f32 {
    a.x * b.x + a.y * b.y
}

/// Unit vector in the direction of `v`, or `None` for (near) zero or
/// non-finite input.
pub fn try_normalized(v: Vector2) -> Option<Vector2> {
    if !v.x.is_finite() || !v.y.is_finite() {
        return None;
    }
    let len = v.length();
    if len <= VECTOR_EPSILON {
        None
    } else {
        Some(Vector2::new(v.x / len, v.y / len))
    }
}

/// Axis orthogonal to `gravity`, used as the horizontal control axis.
pub fn perpendicular(gravity: Vector2) -> Vector2 {
    Vector2::new(gravity.y, -gravity.x)
}

/// Splits `v` into `(parallel, perpendicular)` scalar components relative to
/// the unit `gravity` direction. `parallel > 0` means moving "down".
pub fn decompose(v: Vector2, gravity: Vector2) -> (f32, f32) {
    (dot(v, gravity), dot(v, perpendicular(gravity)))
}

/// Inverse of [`decompose`].
pub fn compose(parallel: f32, perp: f32, gravity: Vector2) -> Vector2 {
    gravity * parallel + perpendicular(gravity) * perp
}

/// `-1.0`, `0.0` or `1.0`. Unlike `f32::signum`, zero maps to zero.
pub fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Half extent of an axis-aligned box of `size` measured along unit `dir`.
pub fn half_extent_along(size: Vector2, dir: Vector2) -> f32 {
    0.5 * (size.x * dir.x.abs() + size.y * dir.y.abs())
}
