//! Collectable item data.

use bevy_ecs::prelude::Component;

/// An item that can sit in the world or in an inventory. Stackable items
/// of the same name merge their quantities when collected.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Item {
    pub name: String,
    pub description: String,
    pub stackable: bool,
    pub quantity: u32,
}

impl Item {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            stackable: false,
            quantity: 1,
        }
    }

    pub fn stackable(name: impl Into<String>, description: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            stackable: true,
            quantity,
        }
    }
}
