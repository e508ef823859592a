//! Enemy behaviour built on the generic state machine.
//!
//! Two phases: [`EnemyPhase::Idle`] stands still until a target comes within
//! detection range, [`EnemyPhase::Chasing`] hands control to a
//! [`DecisionAgent`] until the target leaves that range again. The states
//! receive an [`EnemyContext`] per call, so they never hold references to the
//! machine or to the entity.

use bevy_ecs::prelude::Component;
use log::debug;
use raylib::prelude::Vector2;

use crate::components::agent::{AgentConfig, Decision, DecisionAgent};
use crate::components::locomotion::LocomotionController;
use crate::components::statemachine::{State, StateMachine, Transition};
use crate::resources::collisionworld::CollisionProbe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyPhase {
    Idle,
    Chasing,
}

/// Per-call view of the enemy handed to its states.
pub struct EnemyContext<'a> {
    pub controller: &'a mut dyn LocomotionController,
    pub probe: &'a dyn CollisionProbe,
    pub target: Option<Vector2>,
}

#[derive(Debug, Clone)]
pub enum EnemyState {
    Idle { detection_range: f32 },
    Chasing { agent: DecisionAgent },
}

impl<'a> State<EnemyPhase, EnemyContext<'a>> for EnemyState {
    fn on_enter(&mut self, ctx: &mut EnemyContext<'a>) {
        match self {
            EnemyState::Idle { .. } => ctx.controller.set_horizontal_input(0.0),
            EnemyState::Chasing { agent } => agent.set_target(ctx.target),
        }
    }

    fn tick(&mut self, dt: f32, ctx: &mut EnemyContext<'a>) -> Transition<EnemyPhase> {
        match self {
            EnemyState::Idle { detection_range } => {
                ctx.controller.set_horizontal_input(0.0);
                match ctx.target {
                    Some(target) if (target - ctx.controller.position()).length() <= *detection_range => {
                        Transition::To(EnemyPhase::Chasing)
                    }
                    _ => Transition::None,
                }
            }
            EnemyState::Chasing { agent } => {
                agent.set_target(ctx.target);
                match agent.tick(dt, ctx.controller, ctx.probe) {
                    Decision::Idle => Transition::To(EnemyPhase::Idle),
                    _ => Transition::None,
                }
            }
        }
    }

    fn on_exit(&mut self, ctx: &mut EnemyContext<'a>) {
        if let EnemyState::Chasing { .. } = self {
            ctx.controller.set_horizontal_input(0.0);
        }
    }
}

/// Enemy brain component.
#[derive(Component, Debug, Clone)]
pub struct EnemyBehavior {
    pub machine: StateMachine<EnemyPhase, EnemyState>,
    /// Point the enemy is chasing; refreshed by the behaviour system.
    pub target: Option<Vector2>,
    started: bool,
}

impl EnemyBehavior {
    /// Register both phases once. The machine enters `Idle` on the first
    /// [`tick`](Self::tick).
    pub fn new(config: AgentConfig) -> Self {
        let mut machine = StateMachine::new();
        machine.add_state(
            EnemyPhase::Idle,
            EnemyState::Idle {
                detection_range: config.detection_range,
            },
        );
        machine.add_state(
            EnemyPhase::Chasing,
            EnemyState::Chasing {
                agent: DecisionAgent::new(config),
            },
        );
        Self {
            machine,
            target: None,
            started: false,
        }
    }

    pub fn phase(&self) -> Option<EnemyPhase> {
        self.machine.current()
    }

    /// Last decision taken while chasing.
    pub fn last_decision(&self) -> Option<Decision> {
        match self.machine.state(EnemyPhase::Chasing) {
            Some(EnemyState::Chasing { agent }) => Some(agent.last_decision()),
            _ => None,
        }
    }

    /// Run one behaviour tick. Returns the phase after the tick.
    pub fn tick(
        &mut self,
        dt: f32,
        controller: &mut dyn LocomotionController,
        probe: &dyn CollisionProbe,
    ) -> Option<EnemyPhase> {
        let mut ctx = EnemyContext {
            controller,
            probe,
            target: self.target,
        };
        if !self.started {
            self.started = self.machine.change_state(Some(EnemyPhase::Idle), &mut ctx);
        }
        let before = self.machine.current();
        let after = self.machine.tick(dt, &mut ctx);
        if before != after {
            debug!("EnemyBehavior: {:?} -> {:?}", before, after);
        }
        after
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::locomotion::{DynamicController, MovementProfile};
    use crate::resources::collisionworld::CollisionWorld;

    fn controller() -> DynamicController {
        DynamicController::new(
            MovementProfile::default(),
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 1.0),
        )
    }

    #[test]
    fn stays_idle_without_target() {
        let mut enemy = EnemyBehavior::new(AgentConfig::default());
        let mut c = controller();
        let world = CollisionWorld::new();
        assert_eq!(enemy.tick(0.1, &mut c, &world), Some(EnemyPhase::Idle));
        assert_eq!(enemy.tick(0.1, &mut c, &world), Some(EnemyPhase::Idle));
    }

    #[test]
    fn chases_in_range_and_returns_to_idle() {
        let mut enemy = EnemyBehavior::new(AgentConfig::default());
        let mut c = controller();
        let world = CollisionWorld::new();

        enemy.target = Some(Vector2::new(5.0, 0.0));
        assert_eq!(enemy.tick(0.1, &mut c, &world), Some(EnemyPhase::Chasing));

        enemy.target = Some(Vector2::new(100.0, 0.0));
        assert_eq!(enemy.tick(0.1, &mut c, &world), Some(EnemyPhase::Idle));
        assert_eq!(c.input_direction().x, 0.0);
    }
}
