//! Sweep-and-resolve controller.
//!
//! Velocity is computed directly each physics tick rather than accumulated
//! from forces: the dash velocity while dashing, `input * max_move_speed`
//! along the control axis on the ground, and that (scaled by `air_control`)
//! plus accumulated gravity in the air.
//!
//! The resulting displacement is resolved per world axis, each cast from the
//! unmoved centre. An axis is either committed in full or denied in full; there is no partial
//! sliding up to the contact point. A denied axis also zeroes that velocity
//! component so the next tick starts from rest along it.

use log::debug;
use raylib::prelude::Vector2;

use super::profile::{LocomotionStrategy, MovementProfile};
use super::state::{LocomotionCore, valid_dt};
use super::timers::LocomotionTimers;
use super::LocomotionController;
use crate::events::locomotion::LocomotionEventSink;
use crate::math::{compose, decompose, sign};
use crate::resources::collisionworld::{CollisionProbe, LayerMask};

/// Per-axis outcome of [`resolve_axes`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisResolution {
    /// Displacement actually applied.
    pub committed: Vector2,
    pub blocked_x: bool,
    pub blocked_y: bool,
}

/// Resolve `displacement` for a box at `center` with binary commit/deny per
/// world axis. Both axes are cast from `center`.
pub fn resolve_axes(
    center: Vector2,
    size: Vector2,
    displacement: Vector2,
    probe: &dyn CollisionProbe,
    mask: LayerMask,
) -> AxisResolution {
    let mut committed = Vector2::new(0.0, 0.0);
    let mut blocked_x = false;
    let mut blocked_y = false;

    if displacement.x != 0.0 {
        let dir = Vector2::new(sign(displacement.x), 0.0);
        if probe
            .box_cast(center, size, dir, displacement.x.abs(), mask)
            .is_some()
        {
            blocked_x = true;
        } else {
            committed.x = displacement.x;
        }
    }

    if displacement.y != 0.0 {
        let dir = Vector2::new(0.0, sign(displacement.y));
        if probe
            .box_cast(center, size, dir, displacement.y.abs(), mask)
            .is_some()
        {
            blocked_y = true;
        } else {
            committed.y = displacement.y;
        }
    }

    AxisResolution {
        committed,
        blocked_x,
        blocked_y,
    }
}

#[derive(Debug)]
pub struct KinematicController {
    core: LocomotionCore,
    position: Vector2,
    size: Vector2,
    velocity: Vector2,
    last_displacement: Vector2,
}

impl KinematicController {
    pub fn new(profile: MovementProfile, position: Vector2, size: Vector2) -> Self {
        Self {
            core: LocomotionCore::new(profile),
            position,
            size,
            velocity: Vector2::new(0.0, 0.0),
            last_displacement: Vector2::new(0.0, 0.0),
        }
    }

    pub fn with_sink(mut self, sink: Option<Box<dyn LocomotionEventSink>>) -> Self {
        self.core.set_sink(sink);
        self
    }

    /// Displacement committed by the last physics tick.
    pub fn last_displacement(&self) -> Vector2 {
        self.last_displacement
    }

    pub fn set_velocity(&mut self, velocity: Vector2) {
        self.velocity = velocity;
    }

    fn target_velocity(&mut self, dt: f32) -> Vector2 {
        let g = self.core.gravity_direction();
        let profile = self.core.profile();
        let run = self.core.horizontal_input() * profile.max_move_speed;
        let air_run = run * profile.air_control;
        let strength = profile.gravity_strength;
        let max_fall = profile.max_fall_speed;
        let multiplier = self.core.shape_jump(&mut self.velocity);

        if self.core.is_grounded() {
            // keep an upward launch, drop anything pushing into the floor
            let (parallel, _) = decompose(self.velocity, g);
            return compose(parallel.min(0.0), run, g);
        }

        let (parallel, _) = decompose(self.velocity, g);
        let parallel = (parallel + strength * multiplier * dt).clamp(-max_fall, max_fall);
        compose(parallel, air_run, g)
    }
}

impl LocomotionController for KinematicController {
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
            self.velocity = velocity;
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
        self.velocity
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
        LocomotionStrategy::Kinematic
    }

    fn update(&mut self, dt: f32) {
        if !valid_dt(dt) {
            return;
        }
        self.core.tick_logic(dt);
        self.core.try_jump(&mut self.velocity);
    }

    fn fixed_update(&mut self, dt: f32, probe: &dyn CollisionProbe) {
        if !valid_dt(dt) {
            return;
        }
        let grounded = self.core.probe_ground(probe, self.position, self.size);
        self.core.observe_ground(grounded, dt);

        if grounded && !self.core.is_dashing() {
            let g = self.core.gravity_direction();
            let (parallel, perp) = decompose(self.velocity, g);
            if parallel > 0.0 {
                self.velocity = compose(0.0, perp, g);
            }
        }

        self.core.try_jump(&mut self.velocity);

        if self.core.is_dashing() {
            self.velocity = self.core.dash_velocity();
            if self.core.tick_dash(dt) {
                self.velocity = self.core.dash_end_velocity(self.velocity);
            }
        } else {
            self.velocity = self.target_velocity(dt);
        }

        let mask = self.core.profile().collision_mask;
        let resolution = resolve_axes(self.position, self.size, self.velocity * dt, probe, mask);
        self.position += resolution.committed;
        self.last_displacement = resolution.committed;
        if resolution.blocked_x {
            self.velocity.x = 0.0;
        }
        if resolution.blocked_y {
            self.velocity.y = 0.0;
        }
    }

    fn teleport(&mut self, position: Vector2) {
        debug!(
            "KinematicController: teleport to ({:.2}, {:.2})",
            position.x, position.y
        );
        self.position = position;
        self.velocity = Vector2::new(0.0, 0.0);
        self.last_displacement = Vector2::new(0.0, 0.0);
        self.core.reset_transient();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::collisionworld::{CollisionWorld, StaticSolid};

    const EPSILON: f32 = 1e-4;
    const STEP: f32 = 1.0 / 100.0;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn floor() -> CollisionWorld {
        CollisionWorld::new().with_solid(StaticSolid::from_rect(
            -50.0,
            0.0,
            100.0,
            2.0,
            LayerMask::GROUND,
        ))
    }

    #[test]
    fn settles_on_floor_within_probe_reach() {
        let world = floor();
        let mut c = KinematicController::new(
            MovementProfile::default(),
            Vector2::new(0.0, -4.0),
            Vector2::new(1.0, 1.0),
        );
        for _ in 0..300 {
            c.fixed_update(STEP, &world);
        }
        assert!(c.is_grounded());
        let gap = -(c.position().y + 0.5);
        assert!(gap >= 0.0 && gap < c.core.profile().ground_check_distance);
        assert!(approx_eq(c.velocity().y, 0.0));
    }

    #[test]
    fn grounded_run_uses_full_speed_immediately() {
        let world = floor();
        let mut c = KinematicController::new(
            MovementProfile::default(),
            Vector2::new(0.0, -0.52),
            Vector2::new(1.0, 1.0),
        );
        c.set_horizontal_input(-1.0);
        c.fixed_update(STEP, &world);
        assert!(c.is_grounded());
        let max = c.core.profile().max_move_speed;
        assert!(approx_eq(c.velocity().x, -max));
        assert!(approx_eq(c.last_displacement().x, -max * STEP));
    }

    #[test]
    fn blocked_axis_is_denied_not_clamped() {
        let world = CollisionWorld::new().with_solid(StaticSolid::from_rect(
            1.0,
            -10.0,
            1.0,
            20.0,
            LayerMask::ALL,
        ));
        // right face at 0.5, wall at 1.0: gap 0.5 < requested 2.0
        let r = resolve_axes(
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(2.0, 3.0),
            &world,
            LayerMask::ALL,
        );
        assert!(r.blocked_x);
        assert!(!r.blocked_y);
        assert_eq!(r.committed.x, 0.0);
        assert!(approx_eq(r.committed.y, 3.0));
    }

    #[test]
    fn vertical_axis_is_cast_from_the_unmoved_centre() {
        // a ceiling block that only the x-shifted box would touch going up
        let world = CollisionWorld::new().with_solid(StaticSolid::from_rect(
            1.2,
            -3.0,
            2.0,
            1.0,
            LayerMask::ALL,
        ));
        let r = resolve_axes(
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(1.0, -2.0),
            &world,
            LayerMask::ALL,
        );
        assert!(!r.blocked_x);
        assert!(!r.blocked_y);
        assert!(approx_eq(r.committed.x, 1.0));
        assert!(approx_eq(r.committed.y, -2.0));
    }

    #[test]
    fn dash_velocity_is_held_then_braked() {
        let world = floor();
        let mut c = KinematicController::new(
            MovementProfile::default(),
            Vector2::new(0.0, -0.52),
            Vector2::new(1.0, 1.0),
        );
        c.fixed_update(STEP, &world);
        c.request_dash(Vector2::new(1.0, 0.0));
        let speed = c.core.profile().dash_speed;
        c.fixed_update(STEP, &world);
        assert!(approx_eq(c.velocity().x, speed));
        let mut ticks = 0;
        while c.is_dashing() && ticks < 50 {
            c.fixed_update(STEP, &world);
            ticks += 1;
        }
        assert!(!c.is_dashing());
        let factor = c.core.profile().dash_end_perpendicular_factor;
        assert!(approx_eq(c.velocity().x, speed * factor));
    }
}
