//! Marker for entities driven by the player's input.
//!
//! [`player_input_system`](crate::systems::playerinput::player_input_system)
//! reads [`InputState`](crate::resources::input::InputState) and forwards it
//! to the [`Locomotion`](crate::components::locomotion::Locomotion)
//! controller of every entity carrying [`InputControlled`].

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct InputControlled {
    /// Axis values with a smaller magnitude are treated as zero.
    pub deadzone: f32,
    /// Releasing jump early shortens the jump.
    pub variable_jump: bool,
}

impl Default for InputControlled {
    fn default() -> Self {
        Self {
            deadzone: 0.15,
            variable_jump: true,
        }
    }
}

impl InputControlled {
    pub fn apply_deadzone(&self, value: f32) -> f32 {
        if value.abs() < self.deadzone { 0.0 } else { value }
    }
}
