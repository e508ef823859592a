//! Camera-shake inbox.
//!
//! The camera effect itself lives outside the engine. This resource only
//! collects shake requests raised by
//! [`observe_dash_started`](crate::events::locomotion::observe_dash_started)
//! and keeps a decaying `trauma` value a renderer can sample.

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

/// Trauma added by a single request.
const DEFAULT_KICK: f32 = 0.4;
/// Trauma removed per second.
const DEFAULT_DECAY: f32 = 1.5;
/// Oldest requests are dropped past this many undrained ones.
pub const MAX_PENDING: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShakeRequest {
    pub source: Entity,
    pub direction: Vector2,
}

#[derive(Resource, Debug, Clone)]
pub struct ScreenShake {
    /// Requests not yet consumed by the camera.
    pub pending: Vec<ShakeRequest>,
    /// Current shake strength in `[0, 1]`.
    pub trauma: f32,
    pub kick: f32,
    pub decay: f32,
    /// Requests received since creation.
    pub total_requests: u64,
}

impl Default for ScreenShake {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            trauma: 0.0,
            kick: DEFAULT_KICK,
            decay: DEFAULT_DECAY,
            total_requests: 0,
        }
    }
}

impl ScreenShake {
    pub fn request(&mut self, source: Entity, direction: Vector2) {
        if self.pending.len() >= MAX_PENDING {
            self.pending.remove(0);
        }
        self.pending.push(ShakeRequest { source, direction });
        self.trauma = (self.trauma + self.kick).min(1.0);
        self.total_requests += 1;
    }

    /// Hand pending requests to the camera.
    pub fn drain(&mut self) -> Vec<ShakeRequest> {
        std::mem::take(&mut self.pending)
    }

    pub fn decay(&mut self, dt: f32) {
        self.trauma = (self.trauma - self.decay * dt).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_accumulates_trauma_up_to_one() {
        let mut shake = ScreenShake::default();
        for _ in 0..5 {
            shake.request(Entity::PLACEHOLDER, Vector2::new(1.0, 0.0));
        }
        assert_eq!(shake.trauma, 1.0);
        assert_eq!(shake.total_requests, 5);
        assert_eq!(shake.drain().len(), 5);
        assert!(shake.pending.is_empty());
    }

    #[test]
    fn undrained_inbox_keeps_the_newest_requests() {
        let mut shake = ScreenShake::default();
        for i in 0..(MAX_PENDING + 3) {
            shake.request(Entity::PLACEHOLDER, Vector2::new(i as f32, 0.0));
        }
        assert_eq!(shake.pending.len(), MAX_PENDING);
        assert_eq!(shake.pending[0].direction.x, 3.0);
        assert_eq!(shake.total_requests, (MAX_PENDING + 3) as u64);
    }

    #[test]
    fn decay_floors_at_zero() {
        let mut shake = ScreenShake::default();
        shake.request(Entity::PLACEHOLDER, Vector2::new(0.0, -1.0));
        shake.decay(10.0);
        assert_eq!(shake.trauma, 0.0);
    }
}
