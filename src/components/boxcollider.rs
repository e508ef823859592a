//! Axis-aligned box collider.
//!
//! The box is centred on the entity's [`MapPosition`](super::mapposition::MapPosition)
//! plus `offset`. Static solids use it to describe their extent in the
//! [`CollisionWorld`](crate::resources::collisionworld::CollisionWorld);
//! locomotion entities use its `size` as the controller's collider.

use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct BoxCollider {
    pub size: Vector2,
    pub offset: Vector2,
}

impl BoxCollider {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vector2::new(width.abs(), height.abs()),
            offset: Vector2::zero(),
        }
    }

    pub fn with_offset(mut self, offset: Vector2) -> Self {
        self.offset = offset;
        self
    }

    /// Collider centre for an entity at `position`.
    pub fn center(&self, position: Vector2) -> Vector2 {
        position + self.offset
    }

    /// Returns (min, max) of the collider AABB for an entity at `position`.
    pub fn aabb(&self, position: Vector2) -> (Vector2, Vector2) {
        let c = self.center(position);
        let half = Vector2::new(self.size.x.abs() * 0.5, self.size.y.abs() * 0.5);
        (
            Vector2::new(c.x - half.x, c.y - half.y),
            Vector2::new(c.x + half.x, c.y + half.y),
        )
    }
}
