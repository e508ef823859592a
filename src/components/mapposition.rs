//! World-space position of an entity.
//!
//! The collider centre is this position plus the
//! [`BoxCollider`](super::boxcollider::BoxCollider) offset. Locomotion
//! entities get it written back from their controller every frame by
//! [`sync_locomotion_state`](crate::systems::locomotion::sync_locomotion_state).

use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MapPosition {
    pub pos: Vector2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vector2 { x, y },
        }
    }

    pub fn from_vec(pos: Vector2) -> Self {
        Self { pos }
    }
}
