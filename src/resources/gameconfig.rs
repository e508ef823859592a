//! Simulation configuration resource.
//!
//! Settings are loaded from an INI file. Every key is optional; anything
//! missing keeps its default. Movement profile keys are the field names of
//! [`MovementProfile`], agent keys those of [`AgentConfig`].
//!
//! # Configuration File Format
//!
//! ```ini
//! [simulation]
//! fixed_step = 0.016666
//! max_steps_per_frame = 5
//! frame_delta = 0.016666
//! frames = 600
//! time_scale = 1.0
//!
//! [player]
//! strategy = dynamic
//! max_move_speed = 15.0
//!
//! [enemy]
//! strategy = kinematic
//! max_move_speed = 10.0
//!
//! [agent]
//! detection_range = 15.0
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::components::agent::AgentConfig;
use crate::components::locomotion::{LocomotionStrategy, MovementProfile};
use crate::resources::fixedtime::{DEFAULT_FIXED_STEP, DEFAULT_MAX_STEPS};

const DEFAULT_FRAMES: u32 = 600;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Physics tick length in seconds.
    pub fixed_step: f32,
    pub max_steps_per_frame: u32,
    /// Frame delta used by the headless runner.
    pub frame_delta: f32,
    /// Number of frames the headless runner simulates.
    pub frames: u32,
    pub time_scale: f32,
    pub player_strategy: LocomotionStrategy,
    pub enemy_strategy: LocomotionStrategy,
    pub player_profile: MovementProfile,
    pub enemy_profile: MovementProfile,
    pub agent: AgentConfig,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    pub fn new() -> Self {
        let mut enemy_profile = MovementProfile::default();
        enemy_profile.max_move_speed = 10.0;
        Self {
            fixed_step: DEFAULT_FIXED_STEP,
            max_steps_per_frame: DEFAULT_MAX_STEPS,
            frame_delta: DEFAULT_FIXED_STEP,
            frames: DEFAULT_FRAMES,
            time_scale: 1.0,
            player_strategy: LocomotionStrategy::Dynamic,
            enemy_strategy: LocomotionStrategy::Kinematic,
            player_profile: MovementProfile::default(),
            enemy_profile,
            agent: AgentConfig::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration from the INI file at `config_path`.
    ///
    /// Missing values retain their current values. Returns an error if the
    /// file cannot be read or a present value is malformed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut ini = Ini::new();
        ini.load(&self.config_path)
            .map_err(|e| format!("Failed to load config file {}: {}", self.config_path.display(), e))?;
        self.apply_ini(&ini)?;
        info!("Loaded configuration from {}", self.config_path.display());
        Ok(())
    }

    /// Same as [`load_from_file`](Self::load_from_file) for INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut ini = Ini::new();
        ini.read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply_ini(&ini)
    }

    fn apply_ini(&mut self, ini: &Ini) -> Result<(), String> {
        // [simulation] section
        if let Some(step) = read_float(ini, "simulation", "fixed_step")? {
            if step <= 0.0 {
                return Err(format!("[simulation] fixed_step must be positive, got {}", step));
            }
            self.fixed_step = step;
        }
        if let Some(steps) = read_uint(ini, "simulation", "max_steps_per_frame")? {
            self.max_steps_per_frame = steps.clamp(1, u64::from(u32::MAX)) as u32;
        }
        if let Some(delta) = read_float(ini, "simulation", "frame_delta")? {
            self.frame_delta = delta;
        }
        if let Some(frames) = read_uint(ini, "simulation", "frames")? {
            self.frames = frames.min(u64::from(u32::MAX)) as u32;
        }
        if let Some(scale) = read_float(ini, "simulation", "time_scale")? {
            self.time_scale = scale;
        }

        // [player] / [enemy] sections
        if let Some(s) = ini.get("player", "strategy") {
            self.player_strategy = s.parse()?;
        }
        self.player_profile.apply_ini_section(ini, "player")?;
        if let Some(s) = ini.get("enemy", "strategy") {
            self.enemy_strategy = s.parse()?;
        }
        self.enemy_profile.apply_ini_section(ini, "enemy")?;

        // [agent] section
        self.agent.apply_ini_section(ini, "agent")?;
        Ok(())
    }

    /// Pretty JSON dump of the effective configuration.
    pub fn to_json_string(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {}", e))
    }
}

fn read_float(ini: &Ini, section: &str, key: &str) -> Result<Option<f32>, String> {
    ini.getfloat(section, key)
        .map(|v| v.map(|v| v as f32))
        .map_err(|e| format!("[{}] {}: {}", section, key, e))
}

fn read_uint(ini: &Ini, section: &str, key: &str) -> Result<Option<u64>, String> {
    ini.getuint(section, key)
        .map_err(|e| format!("[{}] {}: {}", section, key, e))
}
