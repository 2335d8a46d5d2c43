//! World-space position and facing angle for an entity.
//!
//! The collision footprint ([`Shape`](super::shape::Shape)) is evaluated
//! at this position, so moving an entity is a single field write with no
//! separate shape sync step.

use bevy_ecs::prelude::Component;
use glam::Vec2;

#[derive(Component, Clone, Copy, Debug)]
pub struct MapPosition {
    pub pos: Vec2,
    /// Facing angle in radians, measured from the +X axis. Updated only
    /// when a movement actually commits.
    pub angle: f32,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            angle: 0.0,
        }
    }

    pub fn at(pos: Vec2) -> Self {
        Self { pos, angle: 0.0 }
    }

    pub fn distance_to(&self, other: Vec2) -> f32 {
        self.pos.distance(other)
    }
}
