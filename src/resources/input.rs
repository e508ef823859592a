//! Per-frame player input resource.
//!
//! The host fills [`InputState`] each frame (from a keyboard, a gamepad, a
//! replay or a script); the engine never polls devices itself.
//! [`player_input_system`](crate::systems::playerinput::player_input_system)
//! is the only reader.

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

/// Button state with edge flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolState {
    /// Whether the button is held this frame.
    pub active: bool,
    /// Whether the button went down this frame.
    pub just_pressed: bool,
    /// Whether the button went up this frame.
    pub just_released: bool,
}

impl BoolState {
    /// Record this frame's level and derive the edges from the previous one.
    pub fn set(&mut self, down: bool) {
        self.just_pressed = down && !self.active;
        self.just_released = !down && self.active;
        self.active = down;
    }
}

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    /// Horizontal axis in `[-1, 1]`, positive to the right.
    pub horizontal: f32,
    /// Vertical axis in `[-1, 1]`, positive down (screen space).
    pub vertical: f32,
    pub jump: BoolState,
    pub dash: BoolState,
}

impl InputState {
    /// Stick direction, or `None` when both axes are zero.
    pub fn direction(&self) -> Option<Vector2> {
        if self.horizontal == 0.0 && self.vertical == 0.0 {
            None
        } else {
            Some(Vector2::new(self.horizontal, self.vertical))
        }
    }
}
