//! Weapon fire control and reload ticking.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;

use crate::components::flags::Active;
use crate::components::mapposition::MapPosition;
use crate::components::projectile::{Bullet, Projectile};
use crate::components::shape::Shape;
use crate::components::weapon::{ReloadState, Weapon};
use crate::error::SimError;
use crate::events::combat::WeaponFired;
use crate::registry::{self, EntityId, SimId};
use crate::resources::worldtime::WorldTime;

/// Result of a fire call. Refusals are defined no-ops, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// A bullet was spawned and registered under this id.
    Fired(EntityId),
    /// The weapon is mid-reload; nothing happened.
    Reloading,
    /// The magazine was empty; a reload was auto-started instead.
    Empty,
}

/// Advance reload timers. Runs for carried weapons too, which have no
/// map presence while they sit in an inventory.
pub fn reload(time: Res<WorldTime>, mut weapons: Query<(&SimId, &mut Weapon)>) {
    for (sim_id, mut weapon) in weapons.iter_mut() {
        if weapon.tick_reload(time.delta) {
            debug!(
                "weapon {} reloaded to {} rounds",
                sim_id.0,
                weapon.current_ammo()
            );
        }
    }
}

/// Fire one round from `weapon_id` towards `direction`, spawning the
/// bullet at `origin` (normally the wielder's position).
///
/// The weapon only gates ammo and reload state per call; automatic fire
/// is driven by the caller issuing repeated calls at `1 / firing_rate`
/// intervals. A zero direction is a construction error and does not
/// spend a round.
pub fn fire(
    world: &mut World,
    weapon_id: EntityId,
    origin: Vec2,
    direction: Vec2,
) -> Result<FireOutcome, SimError> {
    let weapon_entity = registry::get_by_id(world, weapon_id)?;
    let Some(weapon) = world.get::<Weapon>(weapon_entity) else {
        return Err(SimError::Usage(format!(
            "entity {weapon_id} is not a weapon"
        )));
    };

    if weapon.state() == ReloadState::Reloading {
        return Ok(FireOutcome::Reloading);
    }
    if weapon.current_ammo() == 0 {
        // Empty trigger pull: start reloading instead of firing.
        if let Some(mut weapon) = world.get_mut::<Weapon>(weapon_entity) {
            weapon.start_reload();
        }
        return Ok(FireOutcome::Empty);
    }

    let damage = weapon.attack_power();
    let speed = weapon.bullet_speed();
    let range = weapon.firing_range();
    let shooter = weapon.owner;
    let frame = world.resource::<WorldTime>().frame_count;

    // Validate the direction before spending a round.
    let projectile = Projectile::new(direction, damage, speed, range, weapon_id, shooter, frame)?;

    if let Some(mut weapon) = world.get_mut::<Weapon>(weapon_entity) {
        weapon.consume_round();
    }

    let bullet = Bullet::default();
    let mut position = MapPosition::at(origin);
    position.angle = projectile.direction().to_angle();
    let entity = world
        .spawn((
            position,
            Shape::circle(bullet.radius),
            Active(true),
            projectile,
            bullet,
        ))
        .id();
    let bullet_id = registry::add_existing(world, entity);

    world
        .resource_mut::<Messages<WeaponFired>>()
        .write(WeaponFired {
            weapon: weapon_id,
            projectile: bullet_id,
        });
    debug!("weapon {weapon_id} fired bullet {bullet_id}");

    Ok(FireOutcome::Fired(bullet_id))
}
