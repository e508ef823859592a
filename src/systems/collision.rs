//! Collision world maintenance.
use bevy_ecs::prelude::*;
use log::trace;

use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::MapPosition;
use crate::components::solid::Solid;
use crate::resources::collisionworld::{CollisionWorld, StaticSolid};

/// Rebuild the [`CollisionWorld`] from every `Solid` entity.
///
/// Only runs when a solid was added, moved or resized, or when one was
/// removed since the last run.
pub fn rebuild_collision_world(
    solids: Query<(&MapPosition, &BoxCollider, &Solid)>,
    changed: Query<(), (With<Solid>, Or<(Changed<MapPosition>, Changed<BoxCollider>, Changed<Solid>)>)>,
    mut removed: RemovedComponents<Solid>,
    mut world: ResMut<CollisionWorld>,
) {
    let any_removed = removed.read().count() > 0;
    if changed.is_empty() && !any_removed {
        return;
    }
    world.clear();
    for (position, collider, solid) in solids.iter() {
        let (min, max) = collider.aabb(position.pos);
        world.add(StaticSolid::new(min, max, solid.layers));
    }
    trace!("collision world rebuilt with {} solids", world.len());
}
