//! Movement tunables shared by both controller strategies.
//!
//! A [`MovementProfile`] is plain data. It can be built in code, deserialized
//! from JSON (every field is optional and falls back to the default), or
//! overlaid from an INI section by [`MovementProfile::apply_ini_section`].
//!
//! ```ini
//! [player]
//! strategy = kinematic
//! max_move_speed = 12.0
//! max_jumps = 1
//! multi_jump = false
//! ```

use configparser::ini::Ini;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::resources::collisionworld::LayerMask;

/// Which integration strategy a controller uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocomotionStrategy {
    /// Force accumulation on a rigid body.
    #[default]
    Dynamic,
    /// Direct velocity with per-axis commit/deny sweeps.
    Kinematic,
}

impl FromStr for LocomotionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dynamic" => Ok(Self::Dynamic),
            "kinematic" => Ok(Self::Kinematic),
            other => Err(format!(
                "Unknown locomotion strategy '{}' (expected 'dynamic' or 'kinematic')",
                other
            )),
        }
    }
}

impl fmt::Display for LocomotionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dynamic => write!(f, "dynamic"),
            Self::Kinematic => write!(f, "kinematic"),
        }
    }
}

/// Tunables for a locomotion controller.
///
/// Units are world units and seconds. Durations are in seconds, speeds in
/// units per second and accelerations in units per second squared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementProfile {
    // gravity
    pub gravity_strength: f32,
    pub max_fall_speed: f32,
    // horizontal
    pub move_acceleration: f32,
    pub max_move_speed: f32,
    pub air_control: f32,
    pub ground_drag: f32,
    pub air_drag: f32,
    // jump
    pub jump_force: f32,
    pub max_jumps: u32,
    pub multi_jump: bool,
    pub coyote_duration: f32,
    pub jump_buffer_duration: f32,
    pub low_jump_multiplier: f32,
    pub fall_multiplier: f32,
    // dash
    pub dash_speed: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,
    pub max_air_dashes: u32,
    /// Residual velocity kept along the control axis when a dash ends.
    pub dash_end_perpendicular_factor: f32,
    /// Residual velocity kept along gravity when a dash ends.
    pub dash_end_parallel_factor: f32,
    // probing
    pub ground_check_distance: f32,
    pub ground_probe_scale: f32,
    pub ground_mask: LayerMask,
    /// Layers that block movement.
    pub collision_mask: LayerMask,
    pub skin_width: f32,
    pub mass: f32,
}

impl Default for MovementProfile {
    fn default() -> Self {
        Self {
            gravity_strength: 20.0,
            max_fall_speed: 30.0,
            move_acceleration: 8.0,
            max_move_speed: 15.0,
            air_control: 0.8,
            ground_drag: 4.0,
            air_drag: 1.0,
            jump_force: 12.0,
            max_jumps: 2,
            multi_jump: true,
            coyote_duration: 0.1,
            jump_buffer_duration: 0.1,
            low_jump_multiplier: 0.5,
            fall_multiplier: 1.5,
            dash_speed: 25.0,
            dash_duration: 0.15,
            dash_cooldown: 0.5,
            max_air_dashes: 1,
            dash_end_perpendicular_factor: 0.5,
            dash_end_parallel_factor: 0.5,
            ground_check_distance: 0.1,
            ground_probe_scale: 0.95,
            ground_mask: LayerMask::GROUND,
            collision_mask: LayerMask::ALL,
            skin_width: 0.01,
            mass: 1.0,
        }
    }
}

fn read_f32(ini: &Ini, section: &str, key: &str, target: &mut f32) -> Result<(), String> {
    match ini.getfloat(section, key) {
        Ok(Some(v)) => {
            *target = v as f32;
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => Err(format!("[{}] {}: {}", section, key, e)),
    }
}

fn read_u32(ini: &Ini, section: &str, key: &str, target: &mut u32) -> Result<(), String> {
    match ini.getuint(section, key) {
        Ok(Some(v)) => {
            *target = u32::try_from(v).map_err(|e| format!("[{}] {}: {}", section, key, e))?;
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => Err(format!("[{}] {}: {}", section, key, e)),
    }
}

fn read_bool(ini: &Ini, section: &str, key: &str, target: &mut bool) -> Result<(), String> {
    match ini.getbool(section, key) {
        Ok(Some(v)) => {
            *target = v;
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => Err(format!("[{}] {}: {}", section, key, e)),
    }
}

impl MovementProfile {
    /// Parse a profile from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let profile: Self =
            serde_json::from_str(json).map_err(|e| format!("Invalid movement profile: {}", e))?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn to_json_string(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize movement profile: {}", e))
    }

    /// Overlay values present in `[section]` of `ini` onto this profile.
    ///
    /// Keys that are absent keep their current value. A key that is present
    /// but malformed is an error.
    pub fn apply_ini_section(&mut self, ini: &Ini, section: &str) -> Result<(), String> {
        read_f32(ini, section, "gravity_strength", &mut self.gravity_strength)?;
        read_f32(ini, section, "max_fall_speed", &mut self.max_fall_speed)?;
        read_f32(ini, section, "move_acceleration", &mut self.move_acceleration)?;
        read_f32(ini, section, "max_move_speed", &mut self.max_move_speed)?;
        read_f32(ini, section, "air_control", &mut self.air_control)?;
        read_f32(ini, section, "ground_drag", &mut self.ground_drag)?;
        read_f32(ini, section, "air_drag", &mut self.air_drag)?;
        read_f32(ini, section, "jump_force", &mut self.jump_force)?;
        read_u32(ini, section, "max_jumps", &mut self.max_jumps)?;
        read_bool(ini, section, "multi_jump", &mut self.multi_jump)?;
        read_f32(ini, section, "coyote_duration", &mut self.coyote_duration)?;
        read_f32(ini, section, "jump_buffer_duration", &mut self.jump_buffer_duration)?;
        read_f32(ini, section, "low_jump_multiplier", &mut self.low_jump_multiplier)?;
        read_f32(ini, section, "fall_multiplier", &mut self.fall_multiplier)?;
        read_f32(ini, section, "dash_speed", &mut self.dash_speed)?;
        read_f32(ini, section, "dash_duration", &mut self.dash_duration)?;
        read_f32(ini, section, "dash_cooldown", &mut self.dash_cooldown)?;
        read_u32(ini, section, "max_air_dashes", &mut self.max_air_dashes)?;
        read_f32(
            ini,
            section,
            "dash_end_perpendicular_factor",
            &mut self.dash_end_perpendicular_factor,
        )?;
        read_f32(
            ini,
            section,
            "dash_end_parallel_factor",
            &mut self.dash_end_parallel_factor,
        )?;
        read_f32(ini, section, "ground_check_distance", &mut self.ground_check_distance)?;
        read_f32(ini, section, "ground_probe_scale", &mut self.ground_probe_scale)?;
        read_f32(ini, section, "skin_width", &mut self.skin_width)?;
        read_f32(ini, section, "mass", &mut self.mass)?;

        let mut mask = self.ground_mask.0;
        read_u32(ini, section, "ground_mask", &mut mask)?;
        self.ground_mask = LayerMask(mask);
        let mut mask = self.collision_mask.0;
        read_u32(ini, section, "collision_mask", &mut mask)?;
        self.collision_mask = LayerMask(mask);

        self.validate()
    }

    /// Reject values that would make the integration meaningless.
    pub fn validate(&self) -> Result<(), String> {
        let non_negative = [
            ("gravity_strength", self.gravity_strength),
            ("max_fall_speed", self.max_fall_speed),
            ("move_acceleration", self.move_acceleration),
            ("max_move_speed", self.max_move_speed),
            ("air_control", self.air_control),
            ("ground_drag", self.ground_drag),
            ("air_drag", self.air_drag),
            ("jump_force", self.jump_force),
            ("coyote_duration", self.coyote_duration),
            ("jump_buffer_duration", self.jump_buffer_duration),
            ("low_jump_multiplier", self.low_jump_multiplier),
            ("fall_multiplier", self.fall_multiplier),
            ("dash_speed", self.dash_speed),
            ("dash_duration", self.dash_duration),
            ("dash_cooldown", self.dash_cooldown),
            ("ground_check_distance", self.ground_check_distance),
            ("skin_width", self.skin_width),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a finite non-negative number, got {}", name, value));
            }
        }
        if !(self.ground_probe_scale > 0.0 && self.ground_probe_scale <= 1.0) {
            return Err(format!(
                "ground_probe_scale must be in (0, 1], got {}",
                self.ground_probe_scale
            ));
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(format!("mass must be positive, got {}", self.mass));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let p = MovementProfile::default();
        assert!(p.validate().is_ok());
        assert_eq!(p.max_jumps, 2);
        assert!(p.multi_jump);
        assert_eq!(p.ground_mask, LayerMask::GROUND);
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let p = MovementProfile::from_json_str(r#"{ "dash_speed": 40.0, "max_jumps": 1 }"#).unwrap();
        assert_eq!(p.dash_speed, 40.0);
        assert_eq!(p.max_jumps, 1);
        assert_eq!(p.jump_force, MovementProfile::default().jump_force);
    }

    #[test]
    fn json_rejects_negative_duration() {
        let err = MovementProfile::from_json_str(r#"{ "dash_duration": -1.0 }"#).unwrap_err();
        assert!(err.contains("dash_duration"));
    }

    #[test]
    fn json_round_trip_keeps_values() {
        let mut p = MovementProfile::default();
        p.coyote_duration = 0.25;
        p.ground_mask = LayerMask(6);
        let json = p.to_json_string().unwrap();
        assert_eq!(MovementProfile::from_json_str(&json).unwrap(), p);
    }

    #[test]
    fn ini_section_overlays_present_keys() {
        let mut ini = Ini::new();
        ini.read(
            "[enemy]\nmax_move_speed = 9.5\nmulti_jump = false\nground_mask = 3\n".to_string(),
        )
        .unwrap();
        let mut p = MovementProfile::default();
        p.apply_ini_section(&ini, "enemy").unwrap();
        assert_eq!(p.max_move_speed, 9.5);
        assert!(!p.multi_jump);
        assert_eq!(p.ground_mask, LayerMask(3));
        assert_eq!(p.dash_speed, MovementProfile::default().dash_speed);
    }

    #[test]
    fn ini_malformed_value_is_an_error() {
        let mut ini = Ini::new();
        ini.read("[player]\njump_force = high\n".to_string()).unwrap();
        let mut p = MovementProfile::default();
        let err = p.apply_ini_section(&ini, "player").unwrap_err();
        assert!(err.contains("jump_force"));
    }

    #[test]
    fn strategy_parses_case_insensitively() {
        assert_eq!("Kinematic".parse::<LocomotionStrategy>(), Ok(LocomotionStrategy::Kinematic));
        assert_eq!("dynamic".parse::<LocomotionStrategy>(), Ok(LocomotionStrategy::Dynamic));
        assert!("hover".parse::<LocomotionStrategy>().is_err());
    }
}
