//! Read-only locomotion snapshot for renderers and other collaborators.

use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

/// Copied from the entity's controller after every frame. Writing to it has
/// no effect on movement.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct LocomotionStatus {
    pub grounded: bool,
    pub dashing: bool,
    /// `1.0` facing +perpendicular, `-1.0` facing the other way.
    pub facing: f32,
    pub velocity: Vector2,
    pub jumps_remaining: u32,
    pub air_dashes_remaining: u32,
}

impl Default for LocomotionStatus {
    fn default() -> Self {
        Self {
            grounded: false,
            dashing: false,
            facing: 1.0,
            velocity: Vector2 { x: 0.0, y: 0.0 },
            jumps_remaining: 0,
            air_dashes_remaining: 0,
        }
    }
}
