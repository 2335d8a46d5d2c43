//! Inventory and equipment operations.
//!
//! These are boundary commands driven by the input-translation layer,
//! not per-frame systems. Equipment effects are expressed as
//! source-attributed stat modifiers so unequipping removes exactly what
//! equipping added.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::flags::Collectable;
use crate::components::inventory::Inventory;
use crate::components::mapposition::MapPosition;
use crate::components::shape::Shape;
use crate::components::item::Item;
use crate::components::stats::{Modifier, Stat, StatBlock};
use crate::components::weapon::Weapon;
use crate::error::SimError;
use crate::registry::{self, EntityId};

/// Pick a world item up into a collector's inventory. Stackable items
/// merge into an existing stack of the same name and the spent entity
/// is removed; other items keep their registry id but are withdrawn
/// from the map while carried.
pub fn collect_item(
    world: &mut World,
    collector_id: EntityId,
    item_id: EntityId,
) -> Result<(), SimError> {
    let collector = registry::get_by_id(world, collector_id)?;
    let item_entity = registry::get_by_id(world, item_id)?;

    if world.get::<Collectable>(item_entity).is_none() {
        return Err(SimError::Usage(format!("entity {item_id} is not collectable")));
    }
    let Some(item) = world.get::<Item>(item_entity).cloned() else {
        return Err(SimError::Usage(format!("entity {item_id} is not an item")));
    };
    if world.get::<Inventory>(collector).is_none() {
        return Err(SimError::Usage(format!(
            "entity {collector_id} has no inventory"
        )));
    }

    // Try to merge a stackable item into an existing stack.
    let mut merged = false;
    if item.stackable {
        let inventory = world.get::<Inventory>(collector).cloned().unwrap_or_default();
        for held_id in inventory.items() {
            let Ok(held_entity) = registry::get_by_id(world, *held_id) else {
                continue;
            };
            let matches = world
                .get::<Item>(held_entity)
                .is_some_and(|held| held.stackable && held.name == item.name);
            if matches {
                if let Some(mut held) = world.get_mut::<Item>(held_entity) {
                    held.quantity += item.quantity;
                }
                merged = true;
                break;
            }
        }
    }

    if merged {
        // The merged-away entity is spent.
        registry::remove_by_id(world, item_id)?;
    } else {
        world
            .entity_mut(item_entity)
            .remove::<(Collectable, MapPosition, Shape)>();
        if let Some(mut inventory) = world.get_mut::<Inventory>(collector) {
            inventory.push(item_id);
        }
    }
    debug!("entity {collector_id} collected item {item_id} ({})", item.name);
    Ok(())
}

/// Equip a weapon from the owner's inventory. The previous weapon's
/// modifiers are swept first; the new weapon contributes its attack
/// power as an attack modifier and records its owner for projectile
/// exclusion.
pub fn equip_weapon(
    world: &mut World,
    owner_id: EntityId,
    weapon_id: EntityId,
) -> Result<(), SimError> {
    let owner = registry::get_by_id(world, owner_id)?;
    let weapon_entity = registry::get_by_id(world, weapon_id)?;

    let owns = world
        .get::<Inventory>(owner)
        .is_some_and(|inv| inv.contains(weapon_id));
    if !owns {
        return Err(SimError::Usage(format!(
            "weapon {weapon_id} is not in the inventory of {owner_id}"
        )));
    }
    let Some(attack_power) = world.get::<Weapon>(weapon_entity).map(Weapon::attack_power) else {
        return Err(SimError::Usage(format!("item {weapon_id} is not a weapon")));
    };

    // Unhook the previous weapon, if any.
    let previous = world
        .get::<Inventory>(owner)
        .and_then(|inv| inv.equipped_weapon);
    if let Some(previous_id) = previous {
        if let Some(mut stats) = world.get_mut::<StatBlock>(owner) {
            stats.remove_modifiers_from(previous_id);
        }
        if let Ok(previous_entity) = registry::get_by_id(world, previous_id) {
            if let Some(mut old) = world.get_mut::<Weapon>(previous_entity) {
                old.owner = None;
            }
        }
    }

    if let Some(mut stats) = world.get_mut::<StatBlock>(owner) {
        stats.add_modifier(Stat::Attack, Modifier::new(attack_power, weapon_id));
    }
    if let Some(mut weapon) = world.get_mut::<Weapon>(weapon_entity) {
        weapon.owner = Some(owner_id);
    }
    if let Some(mut inventory) = world.get_mut::<Inventory>(owner) {
        inventory.equipped_weapon = Some(weapon_id);
    }
    debug!("entity {owner_id} equipped weapon {weapon_id}");
    Ok(())
}

/// Equip armor from the owner's inventory, contributing `defense_bonus`
/// as a source-attributed defense modifier.
pub fn equip_armor(
    world: &mut World,
    owner_id: EntityId,
    armor_id: EntityId,
    defense_bonus: f32,
) -> Result<(), SimError> {
    let owner = registry::get_by_id(world, owner_id)?;
    registry::get_by_id(world, armor_id)?;

    let owns = world
        .get::<Inventory>(owner)
        .is_some_and(|inv| inv.contains(armor_id));
    if !owns {
        return Err(SimError::Usage(format!(
            "armor {armor_id} is not in the inventory of {owner_id}"
        )));
    }

    let previous = world
        .get::<Inventory>(owner)
        .and_then(|inv| inv.equipped_armor);
    if let Some(previous_id) = previous {
        if let Some(mut stats) = world.get_mut::<StatBlock>(owner) {
            stats.remove_modifiers_from(previous_id);
        }
    }

    if let Some(mut stats) = world.get_mut::<StatBlock>(owner) {
        stats.add_modifier(Stat::Defense, Modifier::new(defense_bonus, armor_id));
    }
    if let Some(mut inventory) = world.get_mut::<Inventory>(owner) {
        inventory.equipped_armor = Some(armor_id);
    }
    debug!("entity {owner_id} equipped armor {armor_id}");
    Ok(())
}

/// Take the current weapon off, removing its modifiers. No-op when
/// nothing is equipped.
pub fn unequip_weapon(world: &mut World, owner_id: EntityId) -> Result<(), SimError> {
    let owner = registry::get_by_id(world, owner_id)?;
    let Some(weapon_id) = world
        .get::<Inventory>(owner)
        .and_then(|inv| inv.equipped_weapon)
    else {
        return Ok(());
    };

    if let Some(mut stats) = world.get_mut::<StatBlock>(owner) {
        stats.remove_modifiers_from(weapon_id);
    }
    if let Ok(weapon_entity) = registry::get_by_id(world, weapon_id) {
        if let Some(mut weapon) = world.get_mut::<Weapon>(weapon_entity) {
            weapon.owner = None;
        }
    }
    if let Some(mut inventory) = world.get_mut::<Inventory>(owner) {
        inventory.equipped_weapon = None;
    }
    Ok(())
}
