//! Fixed-step accumulator for the physics clock.
//!
//! Every frame the scaled frame delta is added to the accumulator and as many
//! whole `step`s as fit are taken out, up to `max_steps_per_frame`. Whatever
//! is left over beyond that cap is dropped so a long hitch cannot snowball
//! into ever longer frames.

use bevy_ecs::prelude::Resource;
use log::warn;

pub const DEFAULT_FIXED_STEP: f32 = 1.0 / 60.0;
pub const DEFAULT_MAX_STEPS: u32 = 5;

#[derive(Resource, Clone, Copy, Debug)]
pub struct FixedTime {
    /// Length of one physics tick in seconds.
    pub step: f32,
    pub accumulator: f32,
    pub max_steps_per_frame: u32,
    /// Steps granted by the last [`accumulate`](Self::accumulate).
    pub steps_this_frame: u32,
    pub total_steps: u64,
}

impl Default for FixedTime {
    fn default() -> Self {
        Self::new(DEFAULT_FIXED_STEP)
    }
}

impl FixedTime {
    /// Non-positive or non-finite steps fall back to the default step.
    pub fn new(step: f32) -> Self {
        Self {
            step: if step.is_finite() && step > 0.0 {
                step
            } else {
                DEFAULT_FIXED_STEP
            },
            accumulator: 0.0,
            max_steps_per_frame: DEFAULT_MAX_STEPS,
            steps_this_frame: 0,
            total_steps: 0,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps_per_frame = max_steps.max(1);
        self
    }

    /// Add `dt` and return how many physics steps to run this frame.
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        if dt.is_finite() && dt > 0.0 {
            self.accumulator += dt;
        }
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps_per_frame {
            self.accumulator -= self.step;
            steps += 1;
        }
        if self.accumulator >= self.step {
            warn!(
                "FixedTime: dropping {:.3}s of simulation (more than {} steps in one frame)",
                self.accumulator, self.max_steps_per_frame
            );
            self.accumulator %= self.step;
        }
        self.steps_this_frame = steps;
        self.total_steps += u64::from(steps);
        steps
    }

    /// Fraction of a step left in the accumulator, for render interpolation.
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }
}
