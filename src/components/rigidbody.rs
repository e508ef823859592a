//! Force-driven body used by the dynamic locomotion strategy.
//!
//! The [`RigidBody`] stores velocity and named acceleration forces that can be
//! toggled independently. The force registered under [`GRAVITY_FORCE`] is
//! additionally scaled by the body's gravity scale, which a dash sets to zero
//! and restores when it ends.
//!
//! Drag follows `velocity *= max(0, 1 - drag * dt)`.

use raylib::prelude::Vector2;
use rustc_hash::FxHashMap;

/// Name of the force scaled by [`RigidBody::gravity_scale`].
pub const GRAVITY_FORCE: &str = "gravity";
/// Name of the horizontal control force.
pub const MOVE_FORCE: &str = "move";

/// A named acceleration force that can be toggled on/off.
#[derive(Clone, Copy, Debug)]
pub struct AccelerationForce {
    /// The acceleration vector in world units per second squared.
    pub value: Vector2,
    pub enabled: bool,
}

impl AccelerationForce {
    pub fn new(value: Vector2) -> Self {
        Self {
            value,
            enabled: true,
        }
    }
}

/// Velocity, named forces, drag and gravity scale.
///
/// # Example
/// ```ignore
/// let mut rb = RigidBody::new(1.0);
/// rb.add_force(GRAVITY_FORCE, Vector2::new(0.0, 20.0));
/// rb.set_gravity_scale(0.0); // e.g. during a dash
/// rb.integrate(1.0 / 60.0);
/// ```
#[derive(Clone, Debug)]
pub struct RigidBody {
    /// Current velocity in world units per second.
    pub velocity: Vector2,
    /// Named accelerations. The total is the sum of all enabled forces.
    pub forces: FxHashMap<String, AccelerationForce>,
    /// Linear drag coefficient applied by [`apply_drag`](Self::apply_drag).
    pub drag: f32,
    pub mass: f32,
    gravity_scale: f32,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl RigidBody {
    /// Body at rest with no forces. Non-positive or non-finite mass becomes 1.
    pub fn new(mass: f32) -> Self {
        Self {
            velocity: Vector2 { x: 0.0, y: 0.0 },
            forces: FxHashMap::default(),
            drag: 0.0,
            mass: if mass.is_finite() && mass > 0.0 { mass } else { 1.0 },
            gravity_scale: 1.0,
        }
    }

    /// Add or update a named acceleration (enabled).
    pub fn add_force(&mut self, name: &str, value: Vector2) {
        self.forces
            .insert(name.to_string(), AccelerationForce::new(value));
    }

    /// Returns false if the force doesn't exist.
    pub fn set_force_enabled(&mut self, name: &str, enabled: bool) -> bool {
        if let Some(force) = self.forces.get_mut(name) {
            force.enabled = enabled;
            true
        } else {
            false
        }
    }

    /// Apply a force (not an acceleration) under `name`, dividing by mass.
    pub fn set_named_force(&mut self, name: &str, force: Vector2) {
        self.add_force(name, force * (1.0 / self.mass));
    }

    pub fn gravity_scale(&self) -> f32 {
        self.gravity_scale
    }

    pub fn set_gravity_scale(&mut self, scale: f32) {
        self.gravity_scale = scale;
    }

    /// Sum of all enabled forces, gravity scaled by the gravity scale.
    pub fn total_acceleration(&self) -> Vector2 {
        let mut total = Vector2 { x: 0.0, y: 0.0 };
        for (name, force) in self.forces.iter() {
            if !force.enabled {
                continue;
            }
            if name == GRAVITY_FORCE {
                total += force.value * self.gravity_scale;
            } else {
                total += force.value;
            }
        }
        total
    }

    /// Advance velocity by the total acceleration.
    pub fn integrate(&mut self, dt: f32) {
        self.velocity += self.total_acceleration() * dt;
    }

    pub fn apply_drag(&mut self, dt: f32) {
        let factor = (1.0 - self.drag * dt).max(0.0);
        self.velocity = self.velocity * factor;
    }
}
