//! Force-accumulation controller.
//!
//! Each physics tick runs, in order:
//!
//! 1. ground probe and grounded-edge bookkeeping,
//! 2. the jump gate,
//! 3. either the dash branch (fixed velocity, no drag, gravity scale zero)
//!    or the force branch: control force toward `input * max_move_speed`,
//!    gravity with jump shaping while airborne, fall-speed clamp, drag and
//!    the horizontal speed clamp,
//! 4. integration of position with per-axis contact resolution.
//!
//! Contact resolution sweeps the collider by the axis displacement plus
//! `skin_width`, stops `skin_width` short of the hit and zeroes that velocity
//! axis.

use log::debug;
use raylib::prelude::Vector2;

use super::profile::{LocomotionStrategy, MovementProfile};
use super::state::{LocomotionCore, valid_dt};
use super::timers::LocomotionTimers;
use super::LocomotionController;
use crate::components::rigidbody::{GRAVITY_FORCE, MOVE_FORCE, RigidBody};
use crate::events::locomotion::LocomotionEventSink;
use crate::math::{compose, decompose, sign};
use crate::resources::collisionworld::{CollisionProbe, LayerMask};

/// Grounded input magnitude below which ground drag applies.
const IDLE_INPUT: f32 = 0.1;

#[derive(Debug)]
pub struct DynamicController {
    core: LocomotionCore,
    body: RigidBody,
    position: Vector2,
    size: Vector2,
    saved_gravity_scale: Option<f32>,
}

impl DynamicController {
    pub fn new(profile: MovementProfile, position: Vector2, size: Vector2) -> Self {
        let mut body = RigidBody::new(profile.mass);
        body.add_force(GRAVITY_FORCE, Vector2::new(0.0, 0.0));
        body.add_force(MOVE_FORCE, Vector2::new(0.0, 0.0));
        Self {
            core: LocomotionCore::new(profile),
            body,
            position,
            size,
            saved_gravity_scale: None,
        }
    }

    pub fn with_sink(mut self, sink: Option<Box<dyn LocomotionEventSink>>) -> Self {
        self.core.set_sink(sink);
        self
    }

    pub fn gravity_scale(&self) -> f32 {
        self.body.gravity_scale()
    }

    /// Ignored while a dash holds the scale at zero; the saved value is
    /// updated instead so the dash restores it.
    pub fn set_gravity_scale(&mut self, scale: f32) {
        if self.saved_gravity_scale.is_some() {
            self.saved_gravity_scale = Some(scale);
        } else {
            self.body.set_gravity_scale(scale);
        }
    }

    pub fn body(&self) -> &RigidBody {
        &self.body
    }

    pub fn set_velocity(&mut self, velocity: Vector2) {
        self.body.velocity = velocity;
    }

    fn end_dash(&mut self) {
        if let Some(scale) = self.saved_gravity_scale.take() {
            self.body.set_gravity_scale(scale);
        }
        self.body.velocity = self.core.dash_end_velocity(self.body.velocity);
    }

    fn apply_forces(&mut self, dt: f32) {
        let profile = self.core.profile().clone();
        let g = self.core.gravity_direction();
        let grounded = self.core.is_grounded();
        let input = self.core.horizontal_input();

        let multiplier = self.core.shape_jump(&mut self.body.velocity);

        let (_, perp_speed) = decompose(self.body.velocity, g);
        let mut coefficient = profile.move_acceleration;
        if !grounded {
            coefficient *= profile.air_control;
        }
        let target = input * profile.max_move_speed;
        self.body.set_named_force(
            MOVE_FORCE,
            self.core.perpendicular() * ((target - perp_speed) * coefficient),
        );

        if grounded {
            self.body.set_force_enabled(GRAVITY_FORCE, false);
            self.body.drag = if input.abs() < IDLE_INPUT {
                profile.ground_drag
            } else {
                0.0
            };
        } else {
            self.body
                .add_force(GRAVITY_FORCE, g * (profile.gravity_strength * multiplier));
            self.body.drag = profile.air_drag;
        }

        self.body.integrate(dt);

        if !grounded {
            let (parallel, perp) = decompose(self.body.velocity, g);
            let clamped = parallel.clamp(-profile.max_fall_speed, profile.max_fall_speed);
            self.body.velocity = compose(clamped, perp, g);
        }

        self.body.apply_drag(dt);

        let (parallel, perp) = decompose(self.body.velocity, g);
        let clamped = perp.clamp(-profile.max_move_speed, profile.max_move_speed);
        self.body.velocity = compose(parallel, clamped, g);
    }

    fn move_body(&mut self, dt: f32, probe: &dyn CollisionProbe) {
        let displacement = self.body.velocity * dt;
        let mask = self.core.profile().collision_mask;
        let skin = self.core.profile().skin_width;
        let (position, blocked_x, blocked_y) =
            sweep_with_contacts(self.position, self.size, displacement, probe, mask, skin);
        self.position = position;
        if blocked_x {
            self.body.velocity.x = 0.0;
        }
        if blocked_y {
            self.body.velocity.y = 0.0;
        }
    }
}

/// Move a box by `displacement` one world axis at a time (x then y), stopping
/// `skin` short of any solid in `mask`.
///
/// Returns the new centre and which axes were blocked.
pub fn sweep_with_contacts(
    center: Vector2,
    size: Vector2,
    displacement: Vector2,
    probe: &dyn CollisionProbe,
    mask: LayerMask,
    skin: f32,
) -> (Vector2, bool, bool) {
    let mut position = center;
    let mut blocked = [false, false];

    for (axis, amount) in [displacement.x, displacement.y].into_iter().enumerate() {
        if amount == 0.0 {
            continue;
        }
        let direction = if axis == 0 {
            Vector2::new(sign(amount), 0.0)
        } else {
            Vector2::new(0.0, sign(amount))
        };
        let travel = match probe.box_cast(position, size, direction, amount.abs() + skin, mask) {
            Some(hit) => {
                blocked[axis] = true;
                (hit.distance - skin).clamp(0.0, amount.abs())
            }
            None => amount.abs(),
        };
        position += direction * travel;
    }
    (position, blocked[0], blocked[1])
}

impl LocomotionController for DynamicController {
    fn set_horizontal_input(&mut self, value: f32) {
        self.core.set_horizontal_input(value);
    }

    fn request_jump(&mut self) {
        self.core.request_jump();
    }

    fn request_jump_cancel(&mut self) {
        self.core.request_jump_cancel();
    }

    fn request_dash(&mut self, direction: Vector2) {
        if let Some(velocity) = self.core.begin_dash(direction) {
            self.saved_gravity_scale = Some(self.body.gravity_scale());
            self.body.set_gravity_scale(0.0);
            self.body.velocity = velocity;
        }
    }

    fn set_gravity_direction(&mut self, direction: Vector2) {
        self.core.set_gravity_direction(direction);
    }

    fn is_grounded(&self) -> bool {
        self.core.is_grounded()
    }

    fn is_dashing(&self) -> bool {
        self.core.is_dashing()
    }

    fn velocity(&self) -> Vector2 {
        self.body.velocity
    }

    fn gravity_direction(&self) -> Vector2 {
        self.core.gravity_direction()
    }

    fn input_direction(&self) -> Vector2 {
        self.core.input_direction()
    }

    fn position(&self) -> Vector2 {
        self.position
    }

    fn size(&self) -> Vector2 {
        self.size
    }

    fn facing(&self) -> f32 {
        self.core.facing()
    }

    fn jumps_remaining(&self) -> u32 {
        self.core.jumps_remaining()
    }

    fn air_dashes_remaining(&self) -> u32 {
        self.core.air_dashes_remaining()
    }

    fn timers(&self) -> LocomotionTimers {
        self.core.timers()
    }

    fn strategy(&self) -> LocomotionStrategy {
        LocomotionStrategy::Dynamic
    }

    fn update(&mut self, dt: f32) {
        if !valid_dt(dt) {
            return;
        }
        self.core.tick_logic(dt);
        self.core.try_jump(&mut self.body.velocity);
    }

    fn fixed_update(&mut self, dt: f32, probe: &dyn CollisionProbe) {
        if !valid_dt(dt) {
            return;
        }
        let grounded = self.core.probe_ground(probe, self.position, self.size);
        self.core.observe_ground(grounded, dt);
        self.core.try_jump(&mut self.body.velocity);

        if self.core.is_dashing() {
            self.body.velocity = self.core.dash_velocity();
            self.body.drag = 0.0;
            if self.core.tick_dash(dt) {
                self.end_dash();
            }
        } else {
            self.apply_forces(dt);
        }

        self.move_body(dt, probe);
    }

    fn teleport(&mut self, position: Vector2) {
        debug!(
            "DynamicController: teleport to ({:.2}, {:.2})",
            position.x, position.y
        );
        if let Some(scale) = self.saved_gravity_scale.take() {
            self.body.set_gravity_scale(scale);
        }
        self.position = position;
        self.body.velocity = Vector2::new(0.0, 0.0);
        self.core.reset_transient();
    }
}
