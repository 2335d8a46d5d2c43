//! Movement intent for characters.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Desired velocity in world units per second. The input layer (for the
/// player) or the brain system (for NPCs) writes it; the movement system
/// consumes it against the collision world each tick.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Velocity(pub Vec2);

impl Velocity {
    pub fn zero() -> Self {
        Self(Vec2::ZERO)
    }

    pub fn set(&mut self, v: Vec2) {
        self.0 = v;
    }
}
