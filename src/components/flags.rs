//! Entity state flags.

use bevy_ecs::prelude::Component;

/// Whether the entity participates in the simulation. Inactive entities
/// are absent from every query (movement, perception, projectiles) and
/// signal removal intent; they are purged explicitly by id.
#[derive(Component, Clone, Copy, Debug)]
pub struct Active(pub bool);

impl Default for Active {
    fn default() -> Self {
        Active(true)
    }
}

/// Marker for entities that block movement and line of sight. A dead
/// character keeps the marker but stops blocking (see
/// [`StatBlock::alive`](super::stats::StatBlock)).
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Solid;

/// Marker for entities that can be picked up into an inventory.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Collectable;
