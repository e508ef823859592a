//! Character locomotion: one contract, two integration strategies.
//!
//! [`LocomotionController`] is everything an input adapter or a decision
//! agent may touch: intent setters, read-only state and the two clocks.
//! [`DynamicController`] accumulates forces on a
//! [`RigidBody`](crate::components::rigidbody::RigidBody);
//! [`KinematicController`] computes a target velocity and resolves the
//! displacement one axis at a time with a binary commit/deny policy. The
//! strategy is picked at construction, see [`build_controller`].
//!
//! Both clocks ignore non-finite or non-positive `dt`.
//!
//! # Related
//!
//! - [`crate::systems::locomotion`] – runs controllers stored in [`Locomotion`] components
//! - [`crate::components::agent`] – drives a controller through this contract

pub mod state;
pub mod dynamic;
pub mod kinematic;
pub mod profile;
pub mod timers;

use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

pub use self::dynamic::DynamicController;
pub use self::kinematic::KinematicController;
pub use self::profile::{LocomotionStrategy, MovementProfile};
pub use self::timers::LocomotionTimers;

use crate::events::locomotion::LocomotionEventSink;
use crate::resources::collisionworld::CollisionProbe;

/// Public contract of a movement controller.
pub trait LocomotionController: Send + Sync {
    // intents
    fn set_horizontal_input(&mut self, value: f32);
    fn request_jump(&mut self);
    fn request_jump_cancel(&mut self);
    fn request_dash(&mut self, direction: Vector2);
    fn set_gravity_direction(&mut self, direction: Vector2);

    // reads
    fn is_grounded(&self) -> bool;
    fn is_dashing(&self) -> bool;
    fn velocity(&self) -> Vector2;
    fn gravity_direction(&self) -> Vector2;
    /// Control axis scaled by the current horizontal input.
    fn input_direction(&self) -> Vector2;
    /// Collider centre in world space.
    fn position(&self) -> Vector2;
    fn size(&self) -> Vector2;
    /// `1.0` or `-1.0`, the sign of the last meaningful horizontal input.
    fn facing(&self) -> f32;
    fn jumps_remaining(&self) -> u32;
    fn air_dashes_remaining(&self) -> u32;
    fn timers(&self) -> LocomotionTimers;
    fn strategy(&self) -> LocomotionStrategy;

    // clocks
    /// Variable-rate logic tick.
    fn update(&mut self, dt: f32);
    /// Fixed-rate physics tick.
    fn fixed_update(&mut self, dt: f32, probe: &dyn CollisionProbe);

    /// Move to `position`, dropping velocity and all timing state.
    fn teleport(&mut self, position: Vector2);
}

/// Construct the controller for `strategy`.
pub fn build_controller(
    strategy: LocomotionStrategy,
    profile: MovementProfile,
    position: Vector2,
    size: Vector2,
    sink: Option<Box<dyn LocomotionEventSink>>,
) -> Box<dyn LocomotionController> {
    match strategy {
        LocomotionStrategy::Dynamic => {
            Box::new(DynamicController::new(profile, position, size).with_sink(sink))
        }
        LocomotionStrategy::Kinematic => {
            Box::new(KinematicController::new(profile, position, size).with_sink(sink))
        }
    }
}

/// Entity component owning a controller.
#[derive(Component)]
pub struct Locomotion {
    pub controller: Box<dyn LocomotionController>,
}

impl Locomotion {
    pub fn new(controller: Box<dyn LocomotionController>) -> Self {
        Self { controller }
    }
}

impl std::fmt::Debug for Locomotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Locomotion")
            .field("strategy", &self.controller.strategy())
            .field("position", &self.controller.position())
            .field("velocity", &self.controller.velocity())
            .field("grounded", &self.controller.is_grounded())
            .finish()
    }
}
