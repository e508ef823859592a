//! Aberred Motion demo entry point.
//!
//! Runs a headless simulation of the demo level: a scripted player (random
//! but seeded walking, jumping and dashing) and an enemy that idles until the
//! player comes into range, then chases it. Status is logged periodically.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run --release -- --frames 1200 --seed 42
//! ```

use std::path::PathBuf;

use aberredmotion::components::behavior::EnemyBehavior;
use aberredmotion::components::locomotion::LocomotionStrategy;
use aberredmotion::components::mapposition::MapPosition;
use aberredmotion::components::status::LocomotionStatus;
use aberredmotion::game::{build_frame_schedule, init_world, run_frame, setup_demo_level};
use aberredmotion::resources::gameconfig::GameConfig;
use aberredmotion::resources::input::InputState;
use aberredmotion::resources::screenshake::ScreenShake;
use bevy_ecs::prelude::*;
use clap::Parser;
use log::{debug, info, warn};

/// Aberred Motion 2D locomotion demo
#[derive(Parser)]
#[command(version, about = "Headless 2D locomotion demo: a scripted player and a chasing enemy.")]
struct Cli {
    /// INI configuration file (default: ./config.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of frames to simulate.
    #[arg(long)]
    frames: Option<u32>,

    /// Player controller: dynamic or kinematic.
    #[arg(long, value_name = "STRATEGY")]
    player_strategy: Option<LocomotionStrategy>,

    /// Enemy controller: dynamic or kinematic.
    #[arg(long, value_name = "STRATEGY")]
    enemy_strategy: Option<LocomotionStrategy>,

    /// Seed for the scripted player input.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

/// Seeded stand-in for a human at the keyboard.
struct ScriptedInput {
    rng: fastrand::Rng,
    horizontal: f32,
    hold_frames: u32,
    jump_frames: u32,
}

impl ScriptedInput {
    fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            horizontal: 0.0,
            hold_frames: 0,
            jump_frames: 0,
        }
    }

    fn drive(&mut self, input: &mut InputState) {
        if self.hold_frames == 0 {
            self.horizontal = match self.rng.u8(0..4) {
                0 => -1.0,
                1 => 0.0,
                _ => 1.0,
            };
            self.hold_frames = self.rng.u32(30..120);
        }
        self.hold_frames -= 1;

        if self.jump_frames == 0 && self.rng.f32() < 0.02 {
            self.jump_frames = self.rng.u32(4..20);
        }
        let jumping = self.jump_frames > 0;
        self.jump_frames = self.jump_frames.saturating_sub(1);

        input.horizontal = self.horizontal;
        input.vertical = 0.0;
        input.jump.set(jumping);
        input.dash.set(self.rng.f32() < 0.01);
    }
}

fn load_config(cli: &Cli) -> GameConfig {
    let mut config = match &cli.config {
        Some(path) => GameConfig::with_path(path),
        None => GameConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }
    if let Some(frames) = cli.frames {
        config.frames = frames;
    }
    if let Some(strategy) = cli.player_strategy {
        config.player_strategy = strategy;
    }
    if let Some(strategy) = cli.enemy_strategy {
        config.enemy_strategy = strategy;
    }
    for (name, profile) in [
        ("player", &mut config.player_profile),
        ("enemy", &mut config.enemy_profile),
    ] {
        if let Err(e) = profile.validate() {
            warn!("Invalid {} profile ({}); using defaults", name, e);
            *profile = Default::default();
        }
    }
    config
}

fn log_status(world: &mut World, frame: u32) {
    let mut query = world.query::<(
        Entity,
        &MapPosition,
        &LocomotionStatus,
        Option<&EnemyBehavior>,
    )>();
    for (entity, position, status, enemy) in query.iter(world) {
        info!(
            "frame {:>5} {:?} pos=({:.2}, {:.2}) vel=({:.2}, {:.2}) grounded={} dashing={} phase={:?}",
            frame,
            entity,
            position.pos.x,
            position.pos.y,
            status.velocity.x,
            status.velocity.y,
            status.grounded,
            status.dashing,
            enemy.and_then(|e| e.phase()),
        );
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli);

    if cli.print_config {
        match config.to_json_string() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    info!("Hello, world! This is Aberred Motion!");
    let mut world = init_world(&config);
    setup_demo_level(&mut world, &config);
    let mut schedule = build_frame_schedule();
    let mut script = ScriptedInput::new(cli.seed);

    // --------------- Main loop ---------------
    for frame in 0..config.frames {
        script.drive(&mut world.resource_mut::<InputState>());
        run_frame(&mut world, &mut schedule, config.frame_delta);
        for shake in world.resource_mut::<ScreenShake>().drain() {
            debug!(
                "camera shake from {:?} toward ({:.2}, {:.2})",
                shake.source, shake.direction.x, shake.direction.y
            );
        }
        if frame % 60 == 0 {
            log_status(&mut world, frame);
        }
    }

    log_status(&mut world, config.frames);
    info!(
        "Simulated {} frames; {} screen shake requests",
        config.frames,
        world.resource::<ScreenShake>().total_requests
    );
}
