//! ECS resources shared across systems.
//!
//! Submodules overview:
//! - [`collisionworld`] – static collision geometry and the shape-probe primitive
//! - [`fixedtime`] – fixed-step accumulator driving the physics clock
//! - [`gameconfig`] – INI-backed simulation, player, enemy and agent settings
//! - [`input`] – per-frame player input filled by the host
//! - [`screenshake`] – camera-shake request inbox
//! - [`worldtime`] – frame clock (elapsed, delta, time scale)

pub mod collisionworld;
pub mod fixedtime;
pub mod gameconfig;
pub mod input;
pub mod screenshake;
pub mod worldtime;
