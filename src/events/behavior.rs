//! Enemy phase transition event.
//!
//! Triggered by [`enemy_behavior_system`](crate::systems::behavior::enemy_behavior_system)
//! whenever an enemy's state machine moves between
//! [`EnemyPhase`](crate::components::behavior::EnemyPhase)s.
//!
//! ```ignore
//! fn on_phase(trigger: On<EnemyPhaseChangedEvent>) {
//!     let e = trigger.event();
//!     log::info!("{:?}: {:?} -> {:?}", e.entity, e.from, e.to);
//! }
//! world.add_observer(on_phase);
//! ```

use bevy_ecs::prelude::*;

use crate::components::behavior::EnemyPhase;

#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyPhaseChangedEvent {
    pub entity: Entity,
    pub from: Option<EnemyPhase>,
    pub to: Option<EnemyPhase>,
}
