//! Bridge systems for controller events.
use bevy_ecs::prelude::*;
use log::debug;

use crate::events::locomotion::{
    DashEndedEvent, DashStartedEvent, JumpedEvent, LandedEvent, LocomotionBridge, LocomotionEvent,
};
use crate::resources::screenshake::ScreenShake;
use crate::resources::worldtime::WorldTime;

/// Drain the [`LocomotionBridge`] channel and trigger the matching bevy
/// events. Non-blocking.
pub fn forward_locomotion_events(bridge: Res<LocomotionBridge>, mut commands: Commands) {
    for (entity, event) in bridge.rx.try_iter() {
        debug!("{:?}: {:?}", entity, event);
        match event {
            LocomotionEvent::Jumped => commands.trigger(JumpedEvent { entity }),
            LocomotionEvent::Landed => commands.trigger(LandedEvent { entity }),
            LocomotionEvent::DashStarted { direction } => {
                commands.trigger(DashStartedEvent { entity, direction })
            }
            LocomotionEvent::DashEnded => commands.trigger(DashEndedEvent { entity }),
        }
    }
}

/// Fade camera-shake trauma with the frame delta.
pub fn decay_screen_shake(time: Res<WorldTime>, mut shake: ResMut<ScreenShake>) {
    shake.decay(time.delta);
}
