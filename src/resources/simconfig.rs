//! Simulation tuning configuration.
//!
//! Loaded once from an INI file into an immutable resource that is
//! passed into the world at construction. Core systems read this
//! resource; nothing in the simulation reads ambient global state.
//!
//! # Configuration File Format
//!
//! ```ini
//! [ai]
//! arrival_threshold = 5.0
//! wander_min_radius = 20.0
//! wander_max_radius = 120.0
//! wander_retarget_chance = 0.02
//!
//! [projectile]
//! max_step = 4.0
//! ```

use bevy_ecs::prelude::Resource;
use configparser::ini::Ini;
use log::info;
use std::path::Path;

use crate::error::SimError;

const DEFAULT_ARRIVAL_THRESHOLD: f32 = 5.0;
const DEFAULT_WANDER_MIN_RADIUS: f32 = 20.0;
const DEFAULT_WANDER_MAX_RADIUS: f32 = 120.0;
const DEFAULT_WANDER_RETARGET_CHANCE: f32 = 0.02;
const DEFAULT_PROJECTILE_MAX_STEP: f32 = 4.0;

/// Wander behavior tuning, handed to decision strategies by value.
#[derive(Clone, Copy, Debug)]
pub struct WanderParams {
    pub min_radius: f32,
    pub max_radius: f32,
    /// Per-tick probability of picking a fresh wander target.
    pub retarget_chance: f32,
}

#[derive(Resource, Clone, Copy, Debug)]
pub struct SimConfig {
    /// Distance below which a movement target counts as reached.
    pub arrival_threshold: f32,
    pub wander: WanderParams,
    /// Maximum distance a projectile travels per collision sub-step.
    /// Bounded sub-steps keep fast bullets from tunneling through thin
    /// solids inside a single frame.
    pub projectile_max_step: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            arrival_threshold: DEFAULT_ARRIVAL_THRESHOLD,
            wander: WanderParams {
                min_radius: DEFAULT_WANDER_MIN_RADIUS,
                max_radius: DEFAULT_WANDER_MAX_RADIUS,
                retarget_chance: DEFAULT_WANDER_RETARGET_CHANCE,
            },
            projectile_max_step: DEFAULT_PROJECTILE_MAX_STEP,
        }
    }
}

impl SimConfig {
    /// Load configuration from an INI file. Missing keys keep their
    /// default values; an unreadable file is a construction error.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let mut ini = Ini::new();
        ini.load(path.as_ref())
            .map_err(|e| SimError::Construction(format!("failed to load config file: {e}")))?;

        let mut config = Self::default();

        if let Some(v) = ini.getfloat("ai", "arrival_threshold").ok().flatten() {
            config.arrival_threshold = v as f32;
        }
        if let Some(v) = ini.getfloat("ai", "wander_min_radius").ok().flatten() {
            config.wander.min_radius = v as f32;
        }
        if let Some(v) = ini.getfloat("ai", "wander_max_radius").ok().flatten() {
            config.wander.max_radius = v as f32;
        }
        if let Some(v) = ini.getfloat("ai", "wander_retarget_chance").ok().flatten() {
            config.wander.retarget_chance = v as f32;
        }
        if let Some(v) = ini.getfloat("projectile", "max_step").ok().flatten() {
            config.projectile_max_step = v as f32;
        }

        info!(
            "Loaded sim config: arrival={}, wander=[{}, {}] @ {}, substep={}",
            config.arrival_threshold,
            config.wander.min_radius,
            config.wander.max_radius,
            config.wander.retarget_chance,
            config.projectile_max_step
        );

        Ok(config)
    }
}
