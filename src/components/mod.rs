//! ECS components for entities.
//!
//! Submodules overview:
//! - [`agent`] – perception/decision agent that drives a controller toward a target
//! - [`behavior`] – enemy `Idle`/`Chasing` behaviour on the state machine engine
//! - [`boxcollider`] – axis-aligned box collider, centred on the entity
//! - [`inputcontrolled`] – marker for player-driven entities
//! - [`locomotion`] – movement controllers (dynamic and kinematic) and their tunables
//! - [`mapposition`] – world-space position of an entity
//! - [`rigidbody`] – force-driven body used by the dynamic controller
//! - [`solid`] – static collision geometry marker
//! - [`statemachine`] – generic finite state machine engine
//! - [`status`] – read-only locomotion snapshot for renderers

pub mod agent;
pub mod behavior;
pub mod boxcollider;
pub mod inputcontrolled;
pub mod locomotion;
pub mod mapposition;
pub mod rigidbody;
pub mod solid;
pub mod statemachine;
pub mod status;
