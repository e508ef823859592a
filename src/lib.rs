//! Aberred Motion library.
//!
//! 2D character locomotion on top of bevy_ecs: controllers, timing windows,
//! a generic state machine, a perception/decision agent and the systems
//! that run them on entities. Exposed as a library for the demo binary and
//! the integration tests.

pub mod components;
pub mod events;
pub mod game;
pub mod math;
pub mod resources;
pub mod systems;
