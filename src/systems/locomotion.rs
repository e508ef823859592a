//! Locomotion clock systems.
//!
//! Per frame, in this order:
//!
//! 1. [`locomotion_logic_system`] – the variable-rate logic tick
//! 2. [`locomotion_physics_system`] – zero or more fixed physics ticks
//! 3. [`sync_locomotion_state`] – copy position and status back to the ECS
use bevy_ecs::prelude::*;

use crate::components::boxcollider::BoxCollider;
use crate::components::locomotion::Locomotion;
use crate::components::mapposition::MapPosition;
use crate::components::status::LocomotionStatus;
use crate::resources::collisionworld::CollisionWorld;
use crate::resources::fixedtime::FixedTime;
use crate::resources::worldtime::WorldTime;

pub fn locomotion_logic_system(time: Res<WorldTime>, mut query: Query<&mut Locomotion>) {
    for mut locomotion in query.iter_mut() {
        locomotion.controller.update(time.delta);
    }
}

/// Run the physics steps granted by [`FixedTime`] this frame.
pub fn locomotion_physics_system(
    fixed: Res<FixedTime>,
    collision: Res<CollisionWorld>,
    mut query: Query<&mut Locomotion>,
) {
    for _ in 0..fixed.steps_this_frame {
        for mut locomotion in query.iter_mut() {
            locomotion.controller.fixed_update(fixed.step, &*collision);
        }
    }
}

/// Write controller state to `MapPosition` and `LocomotionStatus`.
///
/// The controller tracks the collider centre, so the collider offset is
/// subtracted to get the entity position back.
pub fn sync_locomotion_state(
    mut query: Query<(
        &Locomotion,
        &mut MapPosition,
        Option<&BoxCollider>,
        Option<&mut LocomotionStatus>,
    )>,
) {
    for (locomotion, mut position, collider, status) in query.iter_mut() {
        let controller = locomotion.controller.as_ref();
        let mut pos = controller.position();
        if let Some(collider) = collider {
            pos = pos - collider.offset;
        }
        position.pos = pos;

        if let Some(mut status) = status {
            *status = LocomotionStatus {
                grounded: controller.is_grounded(),
                dashing: controller.is_dashing(),
                facing: controller.facing(),
                velocity: controller.velocity(),
                jumps_remaining: controller.jumps_remaining(),
                air_dashes_remaining: controller.air_dashes_remaining(),
            };
        }
    }
}
