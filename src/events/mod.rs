//! Engine events and the observers that react to them.
//!
//! - [`behavior`] – enemy phase transitions
//! - [`locomotion`] – controller notifications (jump, land, dash) and the
//!   channel bridge that carries them into the ECS

pub mod behavior;
pub mod locomotion;
