//! Static collision geometry and the shape-probe primitive.
//!
//! Controllers and agents never talk to a physics engine directly. They only
//! see the [`CollisionProbe`] trait: a box cast and a ray cast filtered by a
//! [`LayerMask`]. [`CollisionWorld`] is the engine's own implementation,
//! rebuilt every frame by
//! [`rebuild_collision_world`](crate::systems::collision::rebuild_collision_world)
//! from entities carrying [`Solid`](crate::components::solid::Solid),
//! [`BoxCollider`](crate::components::boxcollider::BoxCollider) and
//! [`MapPosition`](crate::components::mapposition::MapPosition).
//!
//! # Cast semantics
//!
//! - Touching is not overlapping: a box resting exactly on a surface can
//!   slide along it without being reported as hit.
//! - [`CollisionProbe::box_cast`] ignores solids the box already overlaps at
//!   its origin, so a body can always move out of a penetration.
//! - [`CollisionProbe::raycast`] reports an origin inside a solid as a hit at
//!   distance `0.0`. The agent's ledge probe relies on this, its origin sits
//!   just below the feet, inside the floor.

use bevy_ecs::prelude::Resource;
use raylib::prelude::Vector2;
use serde::{Deserialize, Serialize};

use crate::math::try_normalized;

/// Bit set of collision layers. A probe only sees solids whose layers
/// intersect the probe mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    pub const GROUND: LayerMask = LayerMask(1 << 0);
    pub const WALL: LayerMask = LayerMask(1 << 1);

    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: LayerMask) -> LayerMask {
        LayerMask(self.0 | other.0)
    }
}

/// Result of a successful cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    /// Travel distance along the cast direction before contact.
    pub distance: f32,
    /// Surface normal of the face that was hit (zero when starting inside).
    pub normal: Vector2,
    /// Probe origin moved by `distance` along the cast direction.
    pub point: Vector2,
}

/// The physics backend's query primitive.
///
/// `direction` need not be normalized; a zero direction never hits.
pub trait CollisionProbe {
    /// Sweep an axis-aligned box of `size` centred at `center`.
    fn box_cast(
        &self,
        center: Vector2,
        size: Vector2,
        direction: Vector2,
        distance: f32,
        mask: LayerMask,
    ) -> Option<ProbeHit>;

    /// Cast a ray (a zero-size box) from `origin`.
    fn raycast(
        &self,
        origin: Vector2,
        direction: Vector2,
        distance: f32,
        mask: LayerMask,
    ) -> Option<ProbeHit>;
}

/// An immovable axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticSolid {
    pub min: Vector2,
    pub max: Vector2,
    pub layers: LayerMask,
}

impl StaticSolid {
    pub fn new(min: Vector2, max: Vector2, layers: LayerMask) -> Self {
        Self {
            min: Vector2::new(min.x.min(max.x), min.y.min(max.y)),
            max: Vector2::new(min.x.max(max.x), min.y.max(max.y)),
            layers,
        }
    }

    /// Solid from its top-left corner and size.
    pub fn from_rect(x: f32, y: f32, w: f32, h: f32, layers: LayerMask) -> Self {
        Self::new(Vector2::new(x, y), Vector2::new(x + w, y + h), layers)
    }
}

/// Entry of a ray against an expanded box. `t < 0.0` means the origin is
/// inside the box.
struct SlabHit {
    t: f32,
    normal: Vector2,
}

fn ray_vs_box(origin: Vector2, dir: Vector2, min: Vector2, max: Vector2) -> Option<SlabHit> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    let mut normal = Vector2::new(0.0, 0.0);

    for (o, d, lo, hi, axis_normal) in [
        (origin.x, dir.x, min.x, max.x, Vector2::new(1.0, 0.0)),
        (origin.y, dir.y, min.y, max.y, Vector2::new(0.0, 1.0)),
    ] {
        if d.abs() <= f32::EPSILON {
            // parallel to this slab: must be strictly between the faces
            if o <= lo || o >= hi {
                return None;
            }
            continue;
        }
        let mut t1 = (lo - o) / d;
        let mut t2 = (hi - o) / d;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        if t1 > t_near {
            t_near = t1;
            normal = if d > 0.0 {
                Vector2::new(-axis_normal.x, -axis_normal.y)
            } else {
                axis_normal
            };
        }
        t_far = t_far.min(t2);
    }

    if t_near > t_far || t_far <= 0.0 {
        return None;
    }
    Some(SlabHit { t: t_near, normal })
}

/// Static collision geometry resource.
#[derive(Resource, Debug, Clone, Default)]
pub struct CollisionWorld {
    solids: Vec<StaticSolid>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion, handy for tests and level setup.
    pub fn with_solid(mut self, solid: StaticSolid) -> Self {
        self.solids.push(solid);
        self
    }

    pub fn add(&mut self, solid: StaticSolid) {
        self.solids.push(solid);
    }

    pub fn clear(&mut self) {
        self.solids.clear();
    }

    pub fn len(&self) -> usize {
        self.solids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }

    pub fn solids(&self) -> &[StaticSolid] {
        &self.solids
    }

    fn cast(
        &self,
        origin: Vector2,
        half: Vector2,
        direction: Vector2,
        distance: f32,
        mask: LayerMask,
        report_start_inside: bool,
    ) -> Option<ProbeHit> {
        if mask.is_empty() || !distance.is_finite() || distance < 0.0 {
            return None;
        }
        let dir = try_normalized(direction)?;

        let mut best: Option<ProbeHit> = None;
        for solid in self.solids.iter().filter(|s| s.layers.intersects(mask)) {
            let min = Vector2::new(solid.min.x - half.x, solid.min.y - half.y);
            let max = Vector2::new(solid.max.x + half.x, solid.max.y + half.y);
            let Some(hit) = ray_vs_box(origin, dir, min, max) else {
                continue;
            };
            let (t, normal) = if hit.t < 0.0 {
                if !report_start_inside {
                    continue;
                }
                (0.0, Vector2::new(0.0, 0.0))
            } else {
                (hit.t, hit.normal)
            };
            if t > distance {
                continue;
            }
            if best.is_none_or(|b| t < b.distance) {
                best = Some(ProbeHit {
                    distance: t,
                    normal,
                    point: origin + dir * t,
                });
            }
        }
        best
    }
}

impl CollisionProbe for CollisionWorld {
    fn box_cast(
        &self,
        center: Vector2,
        size: Vector2,
        direction: Vector2,
        distance: f32,
        mask: LayerMask,
    ) -> Option<ProbeHit> {
        let half = Vector2::new(size.x.abs() * 0.5, size.y.abs() * 0.5);
        self.cast(center, half, direction, distance, mask, false)
    }

    fn raycast(
        &self,
        origin: Vector2,
        direction: Vector2,
        distance: f32,
        mask: LayerMask,
    ) -> Option<ProbeHit> {
        self.cast(origin, Vector2::new(0.0, 0.0), direction, distance, mask, true)
    }
}
