//! Enemy behaviour system.
use bevy_ecs::prelude::*;

use crate::components::behavior::EnemyBehavior;
use crate::components::inputcontrolled::InputControlled;
use crate::components::locomotion::Locomotion;
use crate::components::mapposition::MapPosition;
use crate::events::behavior::EnemyPhaseChangedEvent;
use crate::resources::collisionworld::CollisionWorld;
use crate::resources::worldtime::WorldTime;

/// Point every enemy at the nearest player and tick its state machine.
///
/// Triggers [`EnemyPhaseChangedEvent`] when a machine changes phase.
pub fn enemy_behavior_system(
    mut enemies: Query<(Entity, &mut EnemyBehavior, &mut Locomotion)>,
    players: Query<&MapPosition, With<InputControlled>>,
    collision: Res<CollisionWorld>,
    time: Res<WorldTime>,
    mut commands: Commands,
) {
    for (entity, mut behavior, mut locomotion) in enemies.iter_mut() {
        let controller = locomotion.controller.as_mut();
        let here = controller.position();
        behavior.target = players
            .iter()
            .map(|p| p.pos)
            .min_by(|a, b| {
                let da = (*a - here).length();
                let db = (*b - here).length();
                da.total_cmp(&db)
            });

        let before = behavior.phase();
        let after = behavior.tick(time.delta, controller, &*collision);
        if before != after {
            commands.trigger(EnemyPhaseChangedEvent {
                entity,
                from: before,
                to: after,
            });
        }
    }
}
