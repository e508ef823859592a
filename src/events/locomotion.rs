//! Locomotion notifications and the bridge that carries them into the ECS.
//!
//! Controllers never look up collaborators. Each one may hold a boxed
//! [`LocomotionEventSink`] injected at construction and reports
//! [`LocomotionEvent`]s through it. Inside the engine the sink is an
//! [`EntityEventSink`] that tags events with the owning entity and pushes
//! them into the crossbeam channel held by [`LocomotionBridge`].
//! [`forward_locomotion_events`](crate::systems::locomotionevents::forward_locomotion_events)
//! drains that channel once per frame and triggers the bevy events below, so
//! observers such as [`observe_dash_started`] (the camera-shake inbox) react
//! without the controller knowing they exist.
//!
//! ```ignore
//! world.insert_resource(LocomotionBridge::new());
//! world.spawn(Observer::new(observe_dash_started));
//! ```

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::debug;
use raylib::prelude::Vector2;

use crate::resources::screenshake::ScreenShake;

/// Something notable a controller did during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocomotionEvent {
    Jumped,
    Landed,
    /// `direction` is the normalized dash direction.
    DashStarted { direction: Vector2 },
    DashEnded,
}

/// Outbound channel of a controller.
pub trait LocomotionEventSink: Send + Sync {
    fn emit(&self, event: LocomotionEvent);
}

/// Sink that tags events with an entity and sends them over crossbeam.
#[derive(Debug, Clone)]
pub struct EntityEventSink {
    pub entity: Entity,
    tx: Sender<(Entity, LocomotionEvent)>,
}

impl EntityEventSink {
    pub fn new(entity: Entity, tx: Sender<(Entity, LocomotionEvent)>) -> Self {
        Self { entity, tx }
    }
}

impl LocomotionEventSink for EntityEventSink {
    fn emit(&self, event: LocomotionEvent) {
        // receiver gone means the world is shutting down
        let _ = self.tx.try_send((self.entity, event));
    }
}

/// Channel endpoints shared by every controller sink in the world.
#[derive(Resource, Debug, Clone)]
pub struct LocomotionBridge {
    pub tx: Sender<(Entity, LocomotionEvent)>,
    pub rx: Receiver<(Entity, LocomotionEvent)>,
}

impl Default for LocomotionBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl LocomotionBridge {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Build a sink for `entity` feeding this bridge.
    pub fn sink_for(&self, entity: Entity) -> EntityEventSink {
        EntityEventSink::new(entity, self.tx.clone())
    }
}

/// Triggered when an entity starts a dash.
#[derive(Event, Debug, Clone, Copy)]
pub struct DashStartedEvent {
    pub entity: Entity,
    pub direction: Vector2,
}

/// Triggered when an entity's dash runs out.
#[derive(Event, Debug, Clone, Copy)]
pub struct DashEndedEvent {
    pub entity: Entity,
}

/// Triggered when an entity leaves the ground by jumping (including air jumps).
#[derive(Event, Debug, Clone, Copy)]
pub struct JumpedEvent {
    pub entity: Entity,
}

/// Triggered on the airborne to grounded edge.
#[derive(Event, Debug, Clone, Copy)]
pub struct LandedEvent {
    pub entity: Entity,
}

/// Observer that forwards dash starts to the camera-shake inbox.
pub fn observe_dash_started(trigger: On<DashStartedEvent>, mut shake: ResMut<ScreenShake>) {
    let event = trigger.event();
    debug!(
        "Dash started by {:?} towards ({:.2}, {:.2})",
        event.entity, event.direction.x, event.direction.y
    );
    shake.request(event.entity, event.direction);
}
