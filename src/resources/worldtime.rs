use bevy_ecs::prelude::Resource;

/// Frame clock shared by every system.
///
/// `delta` is already scaled by `time_scale`; see
/// [`update_world_time`](crate::systems::time::update_world_time).
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, scale: f32) -> Self {
        self.time_scale = scale;
        self
    }
}
