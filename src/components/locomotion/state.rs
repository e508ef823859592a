//! State and rules shared by both controller strategies.
//!
//! [`LocomotionCore`] owns everything that does not depend on how velocity
//! is integrated: intents, charges, timing windows, the grounded edge, the
//! jump gate, jump shaping, dash gating and event emission. The dynamic and
//! kinematic controllers embed one and add their own integration on top.

use log::trace;
use raylib::prelude::Vector2;

use super::profile::MovementProfile;
use super::timers::{LocomotionTimers, countdown};
use crate::events::locomotion::{LocomotionEvent, LocomotionEventSink};
use crate::math::{compose, decompose, down, half_extent_along, perpendicular, try_normalized};
use crate::resources::collisionworld::CollisionProbe;

/// Inputs below this magnitude do not change facing.
const FACING_THRESHOLD: f32 = 0.01;

/// `true` for a tick length the controllers accept.
pub fn valid_dt(dt: f32) -> bool {
    dt.is_finite() && dt > 0.0
}

pub struct LocomotionCore {
    pub(crate) profile: MovementProfile,
    gravity_direction: Vector2,
    grounded: bool,
    left_ground_this_tick: bool,
    horizontal_input: f32,
    facing: f32,
    jumps_remaining: u32,
    air_dashes_remaining: u32,
    timers: LocomotionTimers,
    dash_active: bool,
    dash_velocity: Vector2,
    jump_cut: bool,
    cut_armed: bool,
    sink: Option<Box<dyn LocomotionEventSink>>,
}

impl std::fmt::Debug for LocomotionCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocomotionCore")
            .field("gravity_direction", &self.gravity_direction)
            .field("grounded", &self.grounded)
            .field("horizontal_input", &self.horizontal_input)
            .field("facing", &self.facing)
            .field("jumps_remaining", &self.jumps_remaining)
            .field("air_dashes_remaining", &self.air_dashes_remaining)
            .field("timers", &self.timers)
            .field("dash_active", &self.dash_active)
            .field("jump_cut", &self.jump_cut)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl LocomotionCore {
    pub fn new(profile: MovementProfile) -> Self {
        Self {
            jumps_remaining: profile.max_jumps,
            air_dashes_remaining: profile.max_air_dashes,
            profile,
            gravity_direction: down(),
            grounded: false,
            left_ground_this_tick: false,
            horizontal_input: 0.0,
            facing: 1.0,
            timers: LocomotionTimers::default(),
            dash_active: false,
            dash_velocity: Vector2::new(0.0, 0.0),
            jump_cut: false,
            cut_armed: false,
            sink: None,
        }
    }

    pub fn set_sink(&mut self, sink: Option<Box<dyn LocomotionEventSink>>) {
        self.sink = sink;
    }

    fn emit(&self, event: LocomotionEvent) {
        if let Some(sink) = &self.sink {
            sink.emit(event);
        }
    }

    // ==================== READS ====================

    pub fn profile(&self) -> &MovementProfile {
        &self.profile
    }

    pub fn gravity_direction(&self) -> Vector2 {
        self.gravity_direction
    }

    pub fn perpendicular(&self) -> Vector2 {
        perpendicular(self.gravity_direction)
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_dashing(&self) -> bool {
        self.dash_active
    }

    pub fn horizontal_input(&self) -> f32 {
        self.horizontal_input
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn input_direction(&self) -> Vector2 {
        self.perpendicular() * self.horizontal_input
    }

    pub fn jumps_remaining(&self) -> u32 {
        self.jumps_remaining
    }

    pub fn air_dashes_remaining(&self) -> u32 {
        self.air_dashes_remaining
    }

    pub fn timers(&self) -> LocomotionTimers {
        self.timers
    }

    pub fn dash_velocity(&self) -> Vector2 {
        self.dash_velocity
    }

    pub fn jump_cut_pending(&self) -> bool {
        self.jump_cut || self.cut_armed
    }

    // ==================== INTENTS ====================

    pub fn set_horizontal_input(&mut self, value: f32) {
        if self.dash_active {
            return;
        }
        let value = if value.is_nan() { 0.0 } else { value.clamp(-1.0, 1.0) };
        self.horizontal_input = value;
        if value.abs() > FACING_THRESHOLD {
            self.facing = value.signum();
        }
    }

    pub fn request_jump(&mut self) {
        self.timers.jump_buffer = self.profile.jump_buffer_duration;
    }

    pub fn request_jump_cancel(&mut self) {
        self.jump_cut = true;
    }

    pub fn set_gravity_direction(&mut self, direction: Vector2) {
        if let Some(g) = try_normalized(direction) {
            self.gravity_direction = g;
        }
    }

    /// Start a dash if every gate allows it. Returns the dash velocity.
    pub fn begin_dash(&mut self, direction: Vector2) -> Option<Vector2> {
        let dir = try_normalized(direction)?;
        if self.dash_active || self.timers.dash_cooldown > 0.0 {
            return None;
        }
        if !self.grounded {
            if self.air_dashes_remaining == 0 {
                return None;
            }
            self.air_dashes_remaining -= 1;
        }
        self.dash_active = true;
        self.timers.dash = self.profile.dash_duration;
        self.timers.dash_cooldown = self.profile.dash_cooldown;
        self.dash_velocity = dir * self.profile.dash_speed;
        trace!("dash started ({:.2}, {:.2})", dir.x, dir.y);
        self.emit(LocomotionEvent::DashStarted { direction: dir });
        Some(self.dash_velocity)
    }

    // ==================== TICKS ====================

    /// Logic clock bookkeeping: windows that count down regardless of contact.
    pub fn tick_logic(&mut self, dt: f32) {
        countdown(&mut self.timers.jump_buffer, dt);
        countdown(&mut self.timers.dash_cooldown, dt);
    }

    /// Probe for ground under a collider centred at `center`.
    ///
    /// The probe box is the collider scaled by `ground_probe_scale` and
    /// shifted so its leading face along gravity matches the collider's.
    pub fn probe_ground(&self, probe: &dyn CollisionProbe, center: Vector2, size: Vector2) -> bool {
        let scale = self.profile.ground_probe_scale;
        let g = self.gravity_direction;
        let shrink = half_extent_along(size, g) * (1.0 - scale);
        let origin = center + g * shrink;
        probe
            .box_cast(
                origin,
                size * scale,
                g,
                self.profile.ground_check_distance,
                self.profile.ground_mask,
            )
            .is_some()
    }

    /// Feed this physics tick's grounded result. Handles both edges and the
    /// airborne coyote countdown.
    ///
    /// Also arms a pending jump cancel for this tick only; whatever
    /// [`shape_jump`](Self::shape_jump) does not use is dropped.
    pub fn observe_ground(&mut self, grounded: bool, dt: f32) {
        self.left_ground_this_tick = false;
        self.cut_armed = std::mem::take(&mut self.jump_cut);
        match (self.grounded, grounded) {
            (false, true) => {
                self.jumps_remaining = self.profile.max_jumps;
                self.air_dashes_remaining = self.profile.max_air_dashes;
                self.timers.coyote = self.profile.coyote_duration;
                self.cut_armed = false;
                trace!("landed");
                self.emit(LocomotionEvent::Landed);
            }
            (true, false) => {
                self.left_ground_this_tick = true;
            }
            (false, false) => {
                countdown(&mut self.timers.coyote, dt);
            }
            (true, true) => {}
        }
        self.grounded = grounded;
    }

    /// Evaluate the jump gate and launch `velocity` when it opens.
    pub fn try_jump(&mut self, velocity: &mut Vector2) -> bool {
        if self.dash_active || self.timers.jump_buffer <= 0.0 || self.jumps_remaining == 0 {
            return false;
        }
        let air_jump =
            !self.grounded && self.profile.multi_jump && !self.left_ground_this_tick;
        if !(self.grounded || self.timers.coyote > 0.0 || air_jump) {
            return false;
        }
        *velocity = self.launch_velocity(*velocity);
        self.jumps_remaining -= 1;
        self.timers.jump_buffer = 0.0;
        self.timers.coyote = 0.0;
        trace!("jumped, {} left", self.jumps_remaining);
        self.emit(LocomotionEvent::Jumped);
        true
    }

    /// `velocity` with its gravity component replaced by the jump impulse.
    pub fn launch_velocity(&self, velocity: Vector2) -> Vector2 {
        let (_, perp) = decompose(velocity, self.gravity_direction);
        compose(-self.profile.jump_force, perp, self.gravity_direction)
    }

    /// Apply variable jump height to `velocity` and return the gravity
    /// multiplier for this tick. An armed cancel only scales an ascent and
    /// is spent either way.
    pub fn shape_jump(&mut self, velocity: &mut Vector2) -> f32 {
        let g = self.gravity_direction;
        let (parallel, perp) = decompose(*velocity, g);
        let cut = std::mem::take(&mut self.cut_armed);
        if parallel < 0.0 {
            if cut {
                *velocity = compose(parallel * self.profile.low_jump_multiplier, perp, g);
            }
            1.0
        } else if parallel > 0.0 {
            self.profile.fall_multiplier
        } else {
            1.0
        }
    }

    /// Count the active dash down. Returns `true` on the tick it ends.
    pub fn tick_dash(&mut self, dt: f32) -> bool {
        if !self.dash_active {
            return false;
        }
        if countdown(&mut self.timers.dash, dt) {
            self.dash_active = false;
            trace!("dash ended");
            self.emit(LocomotionEvent::DashEnded);
            return true;
        }
        false
    }

    /// Residual velocity after a dash, scaled by the soft-brake factors.
    pub fn dash_end_velocity(&self, velocity: Vector2) -> Vector2 {
        let g = self.gravity_direction;
        let (parallel, perp) = decompose(velocity, g);
        compose(
            parallel * self.profile.dash_end_parallel_factor,
            perp * self.profile.dash_end_perpendicular_factor,
            g,
        )
    }

    /// Clear transient state after a teleport or reload.
    pub fn reset_transient(&mut self) {
        self.timers.reset();
        self.dash_active = false;
        self.dash_velocity = Vector2::new(0.0, 0.0);
        self.jump_cut = false;
        self.cut_armed = false;
        self.grounded = false;
        self.left_ground_this_tick = false;
    }
}
