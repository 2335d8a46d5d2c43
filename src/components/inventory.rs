//! Player inventory and equipment slots.
//!
//! The inventory stores weak [`EntityId`] handles; the item entities
//! themselves stay in the registry, withdrawn from the map while
//! carried. Equip and collect operations that touch other entities live
//! in [`crate::systems::equipment`].

use bevy_ecs::prelude::Component;

use crate::error::SimError;
use crate::registry::EntityId;

#[derive(Component, Clone, Debug, Default)]
pub struct Inventory {
    items: Vec<EntityId>,
    pub equipped_weapon: Option<EntityId>,
    pub equipped_armor: Option<EntityId>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[EntityId] {
        &self.items
    }

    pub fn contains(&self, item: EntityId) -> bool {
        self.items.contains(&item)
    }

    pub(crate) fn push(&mut self, item: EntityId) {
        self.items.push(item);
    }

    /// Remove an item by identity. Removing an item that is not present
    /// is a usage error. An equipped item must be unequipped first.
    pub fn remove(&mut self, item: EntityId) -> Result<(), SimError> {
        if self.equipped_weapon == Some(item) || self.equipped_armor == Some(item) {
            return Err(SimError::Usage(format!(
                "item {item} is equipped and cannot be removed"
            )));
        }
        match self.items.iter().position(|i| *i == item) {
            Some(index) => {
                self.items.remove(index);
                Ok(())
            }
            None => Err(SimError::Usage(format!("item {item} not in inventory"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> EntityId {
        EntityId::from_raw(raw)
    }

    #[test]
    fn push_and_remove_roundtrip() {
        let mut inv = Inventory::new();
        inv.push(id(3));
        inv.push(id(4));
        assert!(inv.contains(id(3)));
        inv.remove(id(3)).unwrap();
        assert!(!inv.contains(id(3)));
        assert_eq!(inv.items(), &[id(4)]);
    }

    #[test]
    fn removing_absent_item_is_usage_error() {
        let mut inv = Inventory::new();
        assert!(matches!(inv.remove(id(9)), Err(SimError::Usage(_))));
    }

    #[test]
    fn removing_equipped_item_is_usage_error() {
        let mut inv = Inventory::new();
        inv.push(id(3));
        inv.equipped_weapon = Some(id(3));
        assert!(matches!(inv.remove(id(3)), Err(SimError::Usage(_))));
    }
}
