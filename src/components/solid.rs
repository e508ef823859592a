use bevy_ecs::prelude::Component;

use crate::resources::collisionworld::LayerMask;

/// Marks an entity with a [`BoxCollider`](super::boxcollider::BoxCollider) as
/// static level geometry on `layers`.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Solid {
    pub layers: LayerMask,
}

impl Solid {
    pub fn ground() -> Self {
        Self {
            layers: LayerMask::GROUND,
        }
    }

    pub fn wall() -> Self {
        Self {
            layers: LayerMask::WALL,
        }
    }
}
