//! Input adapter.
//!
//! Translates the host-filled [`InputState`] into controller intents for
//! every [`InputControlled`] entity:
//!
//! - horizontal axis (after the deadzone) → `set_horizontal_input`
//! - jump pressed → `request_jump`; jump released → `request_jump_cancel`
//! - dash pressed → `request_dash` along the stick, or along the facing
//!   direction when the stick is at rest
use bevy_ecs::prelude::*;

use crate::components::inputcontrolled::InputControlled;
use crate::components::locomotion::Locomotion;
use crate::math::perpendicular;
use crate::resources::input::InputState;

pub fn player_input_system(
    input: Res<InputState>,
    mut query: Query<(&InputControlled, &mut Locomotion)>,
) {
    for (control, mut locomotion) in query.iter_mut() {
        let controller = locomotion.controller.as_mut();

        controller.set_horizontal_input(control.apply_deadzone(input.horizontal));

        if input.jump.just_pressed {
            controller.request_jump();
        }
        if input.jump.just_released && control.variable_jump {
            controller.request_jump_cancel();
        }

        if input.dash.just_pressed {
            let stick = InputState {
                horizontal: control.apply_deadzone(input.horizontal),
                vertical: control.apply_deadzone(input.vertical),
                ..*input
            };
            let direction = stick.direction().unwrap_or_else(|| {
                perpendicular(controller.gravity_direction()) * controller.facing()
            });
            controller.request_dash(direction);
        }
    }
}
