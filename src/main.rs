//! Arena simulation entry point.
//!
//! Runs a small headless skirmish: a walled arena, one armed character,
//! and one hostile NPC hunting it. The loop advances the world at a
//! fixed timestep and logs the outcome at the end.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --ticks 600
//! ```

mod components;
mod error;
mod events;
mod game;
mod registry;
mod resources;
mod systems;

use clap::Parser;
use glam::Vec2;
use log::{info, warn};
use std::path::PathBuf;

use crate::components::brain::Attitude;
use crate::components::shape::Shape;
use crate::components::stats::StatBlock;
use crate::components::weapon::FireMode;
use crate::game::Simulation;
use crate::registry::{BrainSpec, EntityId, ItemSpec, SpawnArgs, StatSpec, WeaponSpec};
use crate::resources::simconfig::SimConfig;

/// Headless 2D arena combat simulation.
#[derive(Parser)]
#[command(version, about = "Runs a fixed-timestep arena skirmish")]
struct Cli {
    /// Tuning file in INI format. Missing keys fall back to defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of fixed-timestep frames to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Seconds per frame.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(path) => match SimConfig::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{e}; using defaults");
                SimConfig::default()
            }
        },
        None => SimConfig::default(),
    };

    let mut sim = Simulation::new(config);
    let (player, hunter, rifle) = match build_arena(&mut sim) {
        Ok(ids) => ids,
        Err(e) => {
            eprintln!("failed to build arena: {e}");
            std::process::exit(1);
        }
    };

    let firing_interval = 0.5;
    let mut next_shot = firing_interval;

    for _ in 0..cli.ticks {
        sim.tick(cli.dt);

        // The player holds ground and returns fire while both sides live.
        if sim.elapsed() >= next_shot && is_alive(&sim, player) && is_alive(&sim, hunter) {
            next_shot += firing_interval;
            if let (Ok(from), Ok(to)) = (sim.position_of(player), sim.position_of(hunter)) {
                if let Err(e) = sim.fire(rifle, from, to - from) {
                    warn!("fire failed: {e}");
                }
            }
        }

        sim.purge_inactive();
    }

    report(&sim, "player", player);
    report(&sim, "hunter", hunter);
}

/// Walled arena with an armed character and one hostile NPC.
fn build_arena(sim: &mut Simulation) -> Result<(EntityId, EntityId, EntityId), error::SimError> {
    // 800x600 arena fenced by four wall slabs.
    let walls = [
        (Vec2::new(0.0, 0.0), Shape::rect(800.0, 20.0)),
        (Vec2::new(0.0, 580.0), Shape::rect(800.0, 20.0)),
        (Vec2::new(0.0, 20.0), Shape::rect(20.0, 560.0)),
        (Vec2::new(780.0, 20.0), Shape::rect(20.0, 560.0)),
    ];
    for (pos, shape) in walls {
        sim.create("wall", SpawnArgs::new(pos, shape, "wall"))?;
    }

    let player = sim.create(
        "character",
        SpawnArgs::new(Vec2::new(400.0, 300.0), Shape::rect(24.0, 24.0), "player").with_stats(
            StatSpec {
                max_health: 100.0,
                speed: 120.0,
                attack: 5.0,
                defense: 2.0,
                vision_range: 300.0,
                hearing_range: 400.0,
                attack_range: 5.0,
            },
        ),
    )?;

    let hunter = sim.create(
        "npc",
        SpawnArgs::new(Vec2::new(100.0, 100.0), Shape::circle(12.0), "hunter")
            .with_stats(StatSpec {
                max_health: 60.0,
                speed: 90.0,
                attack: 12.0,
                defense: 1.0,
                vision_range: 250.0,
                hearing_range: 350.0,
                attack_range: 8.0,
            })
            .with_brain(BrainSpec {
                attitude: Attitude::Hostile,
                attack_rate: 1.2,
                quarry: Some(player),
                strategy: None,
            }),
    )?;

    let rifle = sim.create(
        "weapon",
        SpawnArgs::new(Vec2::new(420.0, 300.0), Shape::rect(8.0, 3.0), "rifle")
            .with_item(ItemSpec {
                description: "standard-issue rifle".into(),
                stackable: false,
                quantity: 1,
            })
            .with_weapon(WeaponSpec {
                firing_range: 400.0,
                bullet_speed: 500.0,
                attack_power: 15.0,
                reload_time: 2.0,
                firing_rate: 4.0,
                magazine_capacity: 12,
                fire_modes: vec![FireMode::Single, FireMode::Auto],
            }),
    )?;

    sim.collect_item(player, rifle)?;
    sim.equip_weapon(player, rifle)?;

    info!("arena built: player={player}, hunter={hunter}, rifle={rifle}");
    Ok((player, hunter, rifle))
}

fn is_alive(sim: &Simulation, id: EntityId) -> bool {
    sim.get_by_id(id)
        .ok()
        .and_then(|entity| sim.world().get::<StatBlock>(entity))
        .is_some_and(StatBlock::is_alive)
}

fn report(sim: &Simulation, label: &str, id: EntityId) {
    match sim.get_by_id(id) {
        Ok(entity) => {
            let health = sim
                .world()
                .get::<StatBlock>(entity)
                .map(StatBlock::health)
                .unwrap_or(0.0);
            let pos = sim.position_of(id).unwrap_or(Vec2::ZERO);
            info!("{label}: health {health:.1} at ({:.0}, {:.0})", pos.x, pos.y);
        }
        Err(_) => info!("{label}: removed from the arena"),
    }
}
