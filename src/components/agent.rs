//! Perception and decision agent.
//!
//! A [`DecisionAgent`] chases a target point by issuing intents to a
//! [`LocomotionController`] through its public contract only. Each tick it
//! builds a [`PerceptionSnapshot`] from two ray probes and applies the first
//! matching rule:
//!
//! 1. obstacle ahead while grounded: jump;
//! 2. ledge ahead while grounded, target on the facing side and far enough
//!    past the ledge: dash toward the target;
//! 3. airborne and horizontally far from the target: dash toward it;
//! 4. otherwise walk toward the target, or stop inside the stopping distance
//!    and jump when the target is above.
//!
//! Jump and dash rules each have their own re-trigger delay so the agent
//! does not oscillate. "Horizontal" is always the axis perpendicular to the
//! controller's gravity direction.

use configparser::ini::Ini;
use log::trace;
use raylib::prelude::Vector2;
use serde::{Deserialize, Serialize};

use crate::components::locomotion::LocomotionController;
use crate::math::{dot, half_extent_along, perpendicular, sign};
use crate::resources::collisionworld::{CollisionProbe, LayerMask};

/// Tunables for a [`DecisionAgent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub detection_range: f32,
    pub stopping_distance: f32,
    pub obstacle_check_distance: f32,
    pub ledge_check_distance: f32,
    /// Seconds between jump attempts.
    pub jump_delay: f32,
    /// Seconds between dash attempts.
    pub dash_delay: f32,
    /// Minimum horizontal distance for an airborne dash.
    pub dash_range: f32,
    /// Extra distance beyond `stopping_distance` required for a ledge dash.
    pub ledge_dash_margin: f32,
    /// How far ahead of the leading edge the ledge ray starts.
    pub ledge_probe_forward: f32,
    /// How far below the feet the ledge ray starts.
    pub ledge_probe_drop: f32,
    /// Height above the agent (against gravity) that makes a close target
    /// worth jumping for.
    pub jump_height_threshold: f32,
    /// Layers seen by both probes.
    pub obstacle_mask: LayerMask,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            detection_range: 15.0,
            stopping_distance: 1.5,
            obstacle_check_distance: 0.6,
            ledge_check_distance: 0.5,
            jump_delay: 0.5,
            dash_delay: 0.3,
            dash_range: 5.0,
            ledge_dash_margin: 0.5,
            ledge_probe_forward: 0.1,
            ledge_probe_drop: 0.1,
            jump_height_threshold: 1.0,
            obstacle_mask: LayerMask::ALL,
        }
    }
}

impl AgentConfig {
    pub fn from_json_str(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid agent config: {}", e))
    }

    /// Overlay the keys present in `[section]`.
    pub fn apply_ini_section(&mut self, ini: &Ini, section: &str) -> Result<(), String> {
        let fields: [(&str, &mut f32); 11] = [
            ("detection_range", &mut self.detection_range),
            ("stopping_distance", &mut self.stopping_distance),
            ("obstacle_check_distance", &mut self.obstacle_check_distance),
            ("ledge_check_distance", &mut self.ledge_check_distance),
            ("jump_delay", &mut self.jump_delay),
            ("dash_delay", &mut self.dash_delay),
            ("dash_range", &mut self.dash_range),
            ("ledge_dash_margin", &mut self.ledge_dash_margin),
            ("ledge_probe_forward", &mut self.ledge_probe_forward),
            ("ledge_probe_drop", &mut self.ledge_probe_drop),
            ("jump_height_threshold", &mut self.jump_height_threshold),
        ];
        for (key, target) in fields {
            if let Some(v) = ini
                .getfloat(section, key)
                .map_err(|e| format!("[{}] {}: {}", section, key, e))?
            {
                *target = v as f32;
            }
        }
        if let Some(mask) = ini
            .getuint(section, "obstacle_mask")
            .map_err(|e| format!("[{}] obstacle_mask: {}", section, e))?
        {
            self.obstacle_mask = LayerMask(
                u32::try_from(mask).map_err(|e| format!("[{}] obstacle_mask: {}", section, e))?,
            );
        }
        Ok(())
    }
}

/// What the agent saw this tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PerceptionSnapshot {
    pub target_in_range: bool,
    /// Straight-line distance to the target.
    pub distance: f32,
    /// Signed distance along the control axis; positive means the target is
    /// on the `+perpendicular` side.
    pub horizontal_distance: f32,
    /// Height of the target against gravity; positive means above.
    pub height_above: f32,
    pub obstacle_ahead: bool,
    pub ledge_ahead: bool,
}

/// The rule that fired on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No target or target out of range; input zeroed.
    Idle,
    /// Rule 1.
    Jump,
    /// Rule 2.
    LedgeDash,
    /// Rule 3.
    AirDash,
    /// Rule 4, walking toward the target.
    Chase,
    /// Rule 4, close enough; input zeroed.
    Hold,
    /// Rule 4, close enough and the target is above.
    HoldAndJump,
}

#[derive(Debug, Clone)]
pub struct DecisionAgent {
    pub config: AgentConfig,
    target: Option<Vector2>,
    time_since_jump: f32,
    time_since_dash: f32,
    snapshot: PerceptionSnapshot,
    last_decision: Decision,
}

impl DecisionAgent {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config,
            target: None,
            time_since_jump: f32::INFINITY,
            time_since_dash: f32::INFINITY,
            snapshot: PerceptionSnapshot::default(),
            last_decision: Decision::Idle,
        }
    }

    pub fn set_target(&mut self, target: Option<Vector2>) {
        self.target = target;
    }

    pub fn target(&self) -> Option<Vector2> {
        self.target
    }

    pub fn snapshot(&self) -> PerceptionSnapshot {
        self.snapshot
    }

    pub fn last_decision(&self) -> Decision {
        self.last_decision
    }

    /// Sense only. Fills the snapshot without touching the controller.
    pub fn perceive(
        &self,
        controller: &dyn LocomotionController,
        probe: &dyn CollisionProbe,
    ) -> PerceptionSnapshot {
        let Some(target) = self.target else {
            return PerceptionSnapshot::default();
        };
        let position = controller.position();
        let g = controller.gravity_direction();
        let perp = perpendicular(g);
        let offset = target - position;
        let distance = offset.length();

        let mut snapshot = PerceptionSnapshot {
            target_in_range: distance <= self.config.detection_range,
            distance,
            horizontal_distance: dot(offset, perp),
            height_above: -dot(offset, g),
            obstacle_ahead: false,
            ledge_ahead: false,
        };
        if !snapshot.target_in_range {
            return snapshot;
        }

        let size = controller.size();
        let forward = perp * controller.facing();
        let half_forward = half_extent_along(size, perp);
        let half_down = half_extent_along(size, g);
        let mask = self.config.obstacle_mask;

        let edge = position + forward * half_forward;
        snapshot.obstacle_ahead = probe
            .raycast(edge, forward, self.config.obstacle_check_distance, mask)
            .is_some();

        let ledge_origin = position
            + forward * (half_forward + self.config.ledge_probe_forward)
            + g * (half_down + self.config.ledge_probe_drop);
        snapshot.ledge_ahead = probe
            .raycast(ledge_origin, g, self.config.ledge_check_distance, mask)
            .is_none();

        snapshot
    }

    /// Sense, decide and issue intents for one tick.
    pub fn tick(
        &mut self,
        dt: f32,
        controller: &mut dyn LocomotionController,
        probe: &dyn CollisionProbe,
    ) -> Decision {
        if dt.is_finite() && dt > 0.0 {
            self.time_since_jump += dt;
            self.time_since_dash += dt;
        }

        self.snapshot = self.perceive(controller, probe);
        let decision = self.decide(controller);
        if decision != self.last_decision {
            trace!("agent decision {:?} -> {:?}", self.last_decision, decision);
        }
        self.last_decision = decision;
        decision
    }

    fn decide(&mut self, controller: &mut dyn LocomotionController) -> Decision {
        let snap = self.snapshot;
        let (Some(target), true) = (self.target, snap.target_in_range) else {
            controller.set_horizontal_input(0.0);
            return Decision::Idle;
        };

        let grounded = controller.is_grounded();
        let jump_ready = self.time_since_jump > self.config.jump_delay;
        let dash_ready = self.time_since_dash > self.config.dash_delay;
        let h = snap.horizontal_distance;
        let toward_target = target - controller.position();

        if snap.obstacle_ahead && grounded && jump_ready {
            controller.request_jump();
            self.time_since_jump = 0.0;
            return Decision::Jump;
        }

        if snap.ledge_ahead
            && grounded
            && dash_ready
            && sign(h) == controller.facing()
            && h.abs() > self.config.stopping_distance + self.config.ledge_dash_margin
        {
            controller.request_dash(toward_target);
            self.time_since_dash = 0.0;
            return Decision::LedgeDash;
        }

        if !grounded && dash_ready && h.abs() > self.config.dash_range {
            controller.request_dash(toward_target);
            self.time_since_dash = 0.0;
            return Decision::AirDash;
        }

        if h.abs() > self.config.stopping_distance {
            controller.set_horizontal_input(sign(h));
            return Decision::Chase;
        }

        controller.set_horizontal_input(0.0);
        if snap.height_above > self.config.jump_height_threshold && grounded && jump_ready {
            controller.request_jump();
            self.time_since_jump = 0.0;
            return Decision::HoldAndJump;
        }
        Decision::Hold
    }
}
