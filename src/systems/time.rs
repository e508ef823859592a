//! Time update systems.
//!
//! [`update_world_time`] advances the shared
//! [`WorldTime`](crate::resources::worldtime::WorldTime) once per frame;
//! [`accumulate_fixed_time`] converts the scaled frame delta into a number of
//! fixed physics steps on [`FixedTime`](crate::resources::fixedtime::FixedTime).
use bevy_ecs::prelude::*;

use crate::resources::fixedtime::FixedTime;
use crate::resources::worldtime::WorldTime;

/// Update elapsed and delta seconds on the `WorldTime` resource.
///
/// `dt` is expected to be the unscaled frame delta in seconds. Non-finite or
/// negative deltas count as zero.
pub fn update_world_time(world: &mut World, dt: f32) {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let mut wt = world.resource_mut::<WorldTime>();
    let scaled_dt = dt * wt.time_scale;
    wt.elapsed += scaled_dt;
    wt.delta = scaled_dt;
    wt.frame_count += 1;
}

/// Feed this frame's delta into the fixed-step accumulator.
pub fn accumulate_fixed_time(time: Res<WorldTime>, mut fixed: ResMut<FixedTime>) {
    fixed.accumulate(time.delta);
}
