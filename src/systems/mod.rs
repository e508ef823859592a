//! ECS systems.
//!
//! - [`behavior`] – enemy state machines
//! - [`collision`] – keeps the collision world in sync with solid entities
//! - [`locomotion`] – logic and physics clocks for controllers, state sync
//! - [`locomotionevents`] – controller events into bevy observers
//! - [`playerinput`] – input adapter for player-controlled entities
//! - [`time`] – frame clock and fixed-step accumulator

pub mod behavior;
pub mod collision;
pub mod locomotion;
pub mod locomotionevents;
pub mod playerinput;
pub mod time;
