//! Projectile state for sub-stepped linear motion.

use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::error::SimError;
use crate::registry::EntityId;

/// A projectile in flight. Speed, damage, and range are snapshotted from
/// the firing weapon at fire time; the weapon and shooter handles are
/// weak ids used only for exclusion filters.
#[derive(Component, Clone, Debug)]
pub struct Projectile {
    direction: Vec2,
    pub damage: f32,
    pub speed: f32,
    pub max_range: f32,
    pub distance_travelled: f32,
    pub weapon: EntityId,
    pub shooter: Option<EntityId>,
    /// Frame the projectile was spawned on. It becomes visible to
    /// queries immediately but is not advanced until the next frame.
    pub born_tick: u64,
}

impl Projectile {
    /// A zero-length direction is a construction-time error; it is never
    /// corrected at runtime.
    pub fn new(
        direction: Vec2,
        damage: f32,
        speed: f32,
        max_range: f32,
        weapon: EntityId,
        shooter: Option<EntityId>,
        born_tick: u64,
    ) -> Result<Self, SimError> {
        if direction.length_squared() == 0.0 {
            return Err(SimError::Construction(
                "projectile direction must be non-zero".into(),
            ));
        }
        Ok(Self {
            direction: direction.normalize(),
            damage,
            speed,
            max_range,
            distance_travelled: 0.0,
            weapon,
            shooter,
            born_tick,
        })
    }

    /// Unit direction of travel, normalized once at construction.
    pub fn direction(&self) -> Vec2 {
        self.direction
    }
}

/// Presentation payload for a plain bullet: inert data for the excluded
/// rendering layer, never read by the simulation.
#[derive(Component, Clone, Copy, Debug)]
pub struct Bullet {
    pub radius: f32,
    pub color: (u8, u8, u8),
}

impl Default for Bullet {
    fn default() -> Self {
        Self {
            radius: 1.0,
            color: (255, 255, 0),
        }
    }
}
