//! Per-NPC perception results.

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec2;

use crate::components::shape::Shape;
use crate::registry::EntityId;

/// What the perceiver knows about its designated quarry this frame.
#[derive(Clone, Copy, Debug)]
pub struct PerceivedQuarry {
    pub entity: Entity,
    pub id: EntityId,
    pub position: Vec2,
    pub shape: Option<Shape>,
    pub alive: bool,
}

/// What an NPC perceives this frame, refreshed by the perception system
/// every tick. Sight is range- and occlusion-filtered; hearing is a
/// plain distance check that walls do not stop.
#[derive(Component, Clone, Debug, Default)]
pub struct Perception {
    pub visible: Vec<EntityId>,
    /// Entities within hearing range, occluded or not.
    pub audible: Vec<EntityId>,
    /// Present only when the designated quarry passed both sight checks.
    pub quarry: Option<PerceivedQuarry>,
}

impl Perception {
    pub fn clear(&mut self) {
        self.visible.clear();
        self.audible.clear();
        self.quarry = None;
    }

    pub fn sees(&self, id: EntityId) -> bool {
        self.visible.contains(&id)
    }

    pub fn hears(&self, id: EntityId) -> bool {
        self.audible.contains(&id)
    }
}
