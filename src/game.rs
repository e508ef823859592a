//! World assembly for the locomotion demo and for integration tests.
//!
//! [`init_world`] inserts every resource the systems read and registers the
//! observers; the `spawn_*` helpers build solids and movers;
//! [`build_frame_schedule`] returns the per-frame systems in order and
//! [`run_frame`] advances the world by one frame.
//!
//! ```ignore
//! let config = GameConfig::new();
//! let mut world = init_world(&config);
//! setup_demo_level(&mut world, &config);
//! let mut schedule = build_frame_schedule();
//! for _ in 0..config.frames {
//!     run_frame(&mut world, &mut schedule, config.frame_delta);
//! }
//! ```

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use log::info;
use raylib::prelude::Vector2;

use crate::components::agent::AgentConfig;
use crate::components::behavior::EnemyBehavior;
use crate::components::boxcollider::BoxCollider;
use crate::components::inputcontrolled::InputControlled;
use crate::components::locomotion::{
    Locomotion, LocomotionStrategy, MovementProfile, build_controller,
};
use crate::components::mapposition::MapPosition;
use crate::components::solid::Solid;
use crate::components::status::LocomotionStatus;
use crate::events::locomotion::{LocomotionBridge, LocomotionEventSink, observe_dash_started};
use crate::resources::collisionworld::{CollisionWorld, LayerMask};
use crate::resources::fixedtime::FixedTime;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::screenshake::ScreenShake;
use crate::resources::worldtime::WorldTime;
use crate::systems::behavior::enemy_behavior_system;
use crate::systems::collision::rebuild_collision_world;
use crate::systems::locomotion::{
    locomotion_logic_system, locomotion_physics_system, sync_locomotion_state,
};
use crate::systems::locomotionevents::{decay_screen_shake, forward_locomotion_events};
use crate::systems::playerinput::player_input_system;
use crate::systems::time::{accumulate_fixed_time, update_world_time};

/// Collider size of the demo characters.
pub const CHARACTER_SIZE: Vector2 = Vector2 { x: 1.0, y: 1.0 };

/// Create a world with every resource and observer the frame schedule needs.
pub fn init_world(config: &GameConfig) -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default().with_time_scale(config.time_scale));
    world.insert_resource(FixedTime::new(config.fixed_step).with_max_steps(config.max_steps_per_frame));
    world.insert_resource(CollisionWorld::new());
    world.insert_resource(InputState::default());
    world.insert_resource(ScreenShake::default());
    world.insert_resource(LocomotionBridge::new());
    world.insert_resource(config.clone());
    world.spawn(Observer::new(observe_dash_started));
    // observers must exist before the first system triggers anything
    world.flush();
    world
}

/// Per-frame systems, chained in simulation order.
pub fn build_frame_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            accumulate_fixed_time,
            rebuild_collision_world,
            player_input_system,
            enemy_behavior_system,
            locomotion_logic_system,
            locomotion_physics_system,
            sync_locomotion_state,
            forward_locomotion_events,
            decay_screen_shake,
        )
            .chain(),
    );
    schedule
}

/// Advance `world` by one frame of `dt` seconds.
pub fn run_frame(world: &mut World, schedule: &mut Schedule, dt: f32) {
    update_world_time(world, dt);
    schedule.run(world);
    world.clear_trackers();
}

/// Static box centred at `(x, y)`.
pub fn spawn_solid(world: &mut World, center: Vector2, size: Vector2, layers: LayerMask) -> Entity {
    world
        .spawn((
            MapPosition::from_vec(center),
            BoxCollider::new(size.x, size.y),
            Solid { layers },
        ))
        .id()
}

/// Spawn an entity with a controller at `position`.
///
/// The controller's sink feeds the world's [`LocomotionBridge`] when one is
/// present.
pub fn spawn_mover(
    world: &mut World,
    strategy: LocomotionStrategy,
    profile: MovementProfile,
    position: Vector2,
    size: Vector2,
) -> Entity {
    let collider = BoxCollider::new(size.x, size.y);
    let entity = world
        .spawn((
            MapPosition::from_vec(position),
            collider,
            LocomotionStatus::default(),
        ))
        .id();
    let sink = world
        .get_resource::<LocomotionBridge>()
        .map(|bridge| Box::new(bridge.sink_for(entity)) as Box<dyn LocomotionEventSink>);
    let controller = build_controller(
        strategy,
        profile,
        collider.center(position),
        collider.size,
        sink,
    );
    world.entity_mut(entity).insert(Locomotion::new(controller));
    entity
}

pub fn spawn_player(
    world: &mut World,
    strategy: LocomotionStrategy,
    profile: MovementProfile,
    position: Vector2,
) -> Entity {
    let entity = spawn_mover(world, strategy, profile, position, CHARACTER_SIZE);
    world.entity_mut(entity).insert(InputControlled::default());
    entity
}

pub fn spawn_enemy(
    world: &mut World,
    strategy: LocomotionStrategy,
    profile: MovementProfile,
    agent: AgentConfig,
    position: Vector2,
) -> Entity {
    let entity = spawn_mover(world, strategy, profile, position, CHARACTER_SIZE);
    world.entity_mut(entity).insert(EnemyBehavior::new(agent));
    entity
}

/// Entities created by [`setup_demo_level`].
#[derive(Debug, Clone, Copy)]
pub struct DemoLevel {
    pub player: Entity,
    pub enemy: Entity,
}

/// Two floor segments with a gap, a low wall on the first one, a player on
/// the left and an enemy on the right.
pub fn setup_demo_level(world: &mut World, config: &GameConfig) -> DemoLevel {
    let ground = LayerMask::GROUND;
    spawn_solid(world, Vector2::new(-2.5, 1.0), Vector2::new(35.0, 2.0), ground);
    spawn_solid(world, Vector2::new(29.0, 1.0), Vector2::new(22.0, 2.0), ground);
    spawn_solid(
        world,
        Vector2::new(8.0, -0.6),
        Vector2::new(1.0, 1.2),
        ground.union(LayerMask::WALL),
    );

    let player = spawn_player(
        world,
        config.player_strategy,
        config.player_profile.clone(),
        Vector2::new(0.0, -0.5),
    );
    let enemy = spawn_enemy(
        world,
        config.enemy_strategy,
        config.enemy_profile.clone(),
        config.agent.clone(),
        Vector2::new(24.0, -0.5),
    );
    info!(
        "Demo level ready: player {:?} ({}), enemy {:?} ({})",
        player, config.player_strategy, enemy, config.enemy_strategy
    );
    DemoLevel { player, enemy }
}
