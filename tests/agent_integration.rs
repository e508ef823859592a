//! Decision agent rules against real collision geometry.

use raylib::prelude::Vector2;

use aberredmotion::components::agent::{AgentConfig, Decision, DecisionAgent};
use aberredmotion::components::locomotion::{
    KinematicController, LocomotionController, MovementProfile,
};
use aberredmotion::resources::collisionworld::{CollisionWorld, LayerMask, StaticSolid};

const DT: f32 = 0.1;

/// Floor with its top face at y = 0 spanning `[left, right]`.
fn floor(left: f32, right: f32) -> StaticSolid {
    StaticSolid::from_rect(left, 0.0, right - left, 2.0, LayerMask::GROUND)
}

/// A 1x1 kinematic controller standing on `world` at x = 0.
fn grounded_controller(world: &CollisionWorld) -> KinematicController {
    let mut c = KinematicController::new(
        MovementProfile::default(),
        Vector2::new(0.0, -0.52),
        Vector2::new(1.0, 1.0),
    );
    c.fixed_update(1.0 / 60.0, world);
    assert!(c.is_grounded());
    c
}

fn agent_targeting(target: Vector2) -> DecisionAgent {
    let mut agent = DecisionAgent::new(AgentConfig::default());
    agent.set_target(Some(target));
    agent
}

#[test]
fn no_target_idles_and_zeroes_input() {
    let world = CollisionWorld::new().with_solid(floor(-20.0, 20.0));
    let mut c = grounded_controller(&world);
    c.set_horizontal_input(1.0);
    let mut agent = DecisionAgent::new(AgentConfig::default());
    assert_eq!(agent.tick(DT, &mut c, &world), Decision::Idle);
    assert_eq!(c.input_direction().x, 0.0);
}

#[test]
fn target_out_of_range_idles() {
    let world = CollisionWorld::new().with_solid(floor(-20.0, 20.0));
    let mut c = grounded_controller(&world);
    let mut agent = agent_targeting(Vector2::new(100.0, -0.5));
    assert_eq!(agent.tick(DT, &mut c, &world), Decision::Idle);
    assert!(!agent.snapshot().target_in_range);
}

#[test]
fn chases_toward_target_on_flat_ground() {
    let world = CollisionWorld::new().with_solid(floor(-20.0, 20.0));
    let mut c = grounded_controller(&world);

    let mut agent = agent_targeting(Vector2::new(5.0, -0.5));
    assert_eq!(agent.tick(DT, &mut c, &world), Decision::Chase);
    assert_eq!(c.input_direction().x, 1.0);

    agent.set_target(Some(Vector2::new(-5.0, -0.5)));
    assert_eq!(agent.tick(DT, &mut c, &world), Decision::Chase);
    assert_eq!(c.input_direction().x, -1.0);
    assert_eq!(c.facing(), -1.0);
}

#[test]
fn holds_inside_stopping_distance() {
    let world = CollisionWorld::new().with_solid(floor(-20.0, 20.0));
    let mut c = grounded_controller(&world);
    c.set_horizontal_input(1.0);
    let mut agent = agent_targeting(Vector2::new(1.0, -0.5));
    assert_eq!(agent.tick(DT, &mut c, &world), Decision::Hold);
    assert_eq!(c.input_direction().x, 0.0);
}

#[test]
fn obstacle_beats_ledge() {
    // floor ends just past the leading edge; wall sits beyond the gap
    let world = CollisionWorld::new()
        .with_solid(floor(-20.0, 0.55))
        .with_solid(StaticSolid::from_rect(0.8, -3.0, 1.0, 2.9, LayerMask::WALL));
    let mut c = grounded_controller(&world);

    let mut agent = agent_targeting(Vector2::new(10.0, -0.5));
    let decision = agent.tick(DT, &mut c, &world);
    let snap = agent.snapshot();
    assert!(snap.obstacle_ahead);
    assert!(snap.ledge_ahead);
    assert_eq!(decision, Decision::Jump);
    assert!(c.timers().jump_buffer > 0.0);
    assert!(!c.is_dashing());
}

#[test]
fn ledge_dash_toward_far_target() {
    let world = CollisionWorld::new().with_solid(floor(-20.0, 0.55));
    let mut c = grounded_controller(&world);

    let mut agent = agent_targeting(Vector2::new(10.0, -0.5));
    assert_eq!(agent.tick(DT, &mut c, &world), Decision::LedgeDash);
    assert!(c.is_dashing());
    assert!(c.velocity().x > 0.0);
}

#[test]
fn ledge_behind_target_side_is_not_dashed() {
    let world = CollisionWorld::new().with_solid(floor(-20.0, 0.55));
    let mut c = grounded_controller(&world);

    // facing +x toward the ledge, target on the other side
    let mut agent = agent_targeting(Vector2::new(-10.0, -0.5));
    assert_eq!(agent.tick(DT, &mut c, &world), Decision::Chase);
    assert!(!c.is_dashing());
}

#[test]
fn air_dash_respects_delay() {
    let world = CollisionWorld::new();
    let mut c = KinematicController::new(
        MovementProfile::default(),
        Vector2::new(0.0, -5.0),
        Vector2::new(1.0, 1.0),
    );
    let mut agent = agent_targeting(Vector2::new(10.0, -5.0));

    assert_eq!(agent.tick(DT, &mut c, &world), Decision::AirDash);
    assert!(c.is_dashing());
    assert_eq!(c.air_dashes_remaining(), 0);

    // dash_delay not yet elapsed: falls through to chasing
    assert_eq!(agent.tick(DT, &mut c, &world), Decision::Chase);
}

#[test]
fn close_target_above_triggers_jump_once_per_delay() {
    let world = CollisionWorld::new().with_solid(floor(-20.0, 20.0));
    let mut c = grounded_controller(&world);
    let mut agent = agent_targeting(Vector2::new(1.0, -3.0));

    assert_eq!(agent.tick(DT, &mut c, &world), Decision::HoldAndJump);
    assert!(agent.snapshot().height_above > 1.0);
    assert_eq!(agent.tick(DT, &mut c, &world), Decision::Hold);
}

#[test]
fn agent_steers_only_through_the_contract() {
    let world = CollisionWorld::new().with_solid(floor(-20.0, 20.0));
    let mut c = grounded_controller(&world);
    let controller: &mut dyn LocomotionController = &mut c;
    let mut agent = agent_targeting(Vector2::new(6.0, -0.5));
    for _ in 0..10 {
        agent.tick(DT, controller, &world);
        controller.update(DT);
        controller.fixed_update(DT, &world);
    }
    assert!(controller.position().x > 0.0);
}
