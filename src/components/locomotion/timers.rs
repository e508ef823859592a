//! Jump and dash timing windows.
//!
//! | Timer           | Set when                  | Counts down while        |
//! |-----------------|---------------------------|--------------------------|
//! | `coyote`        | landing edge              | airborne (physics tick)  |
//! | `jump_buffer`   | jump request              | always (logic tick)      |
//! | `dash`          | dash start                | dashing (physics tick)   |
//! | `dash_cooldown` | dash start                | always (logic tick)      |
//!
//! All timers are plain seconds, never negative.

/// Decrement `timer` by `dt`, flooring at zero. Returns `true` on the call
/// that brings a running timer to zero.
pub fn countdown(timer: &mut f32, dt: f32) -> bool {
    if *timer <= 0.0 {
        *timer = 0.0;
        return false;
    }
    *timer = (*timer - dt).max(0.0);
    *timer == 0.0
}

/// Snapshot of a controller's timing windows.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocomotionTimers {
    pub coyote: f32,
    pub jump_buffer: f32,
    pub dash: f32,
    pub dash_cooldown: f32,
}

impl LocomotionTimers {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn all_idle(&self) -> bool {
        self.coyote == 0.0 && self.jump_buffer == 0.0 && self.dash == 0.0 && self.dash_cooldown == 0.0
    }
}
