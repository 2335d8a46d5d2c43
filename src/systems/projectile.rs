//! Sub-stepped projectile motion with continuous collision detection.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::flags::Active;
use crate::components::mapposition::MapPosition;
use crate::components::projectile::Projectile;
use crate::components::shape::Shape;
use crate::events::combat::DamageEvent;
use crate::registry::{self, EntityIndex};
use crate::resources::simconfig::SimConfig;
use crate::resources::worldtime::WorldTime;

/// Advance every projectile spawned before this frame.
///
/// The frame's travel distance is split into sub-steps no longer than
/// the configured maximum; after each sub-step the projectile re-scans
/// all active solid entities, excluding itself and the firing weapon's
/// owner. The first hit resolves exactly once and stops the flight. A
/// projectile that exhausts its weapon's firing range deactivates
/// regardless of collisions.
pub fn fly(world: &mut World) {
    let (dt, frame) = {
        let time = world.resource::<WorldTime>();
        (time.delta, time.frame_count)
    };
    let max_step = world.resource::<SimConfig>().projectile_max_step;

    for id in registry::all_entities(world) {
        let Ok(entity) = registry::get_by_id(world, id) else {
            continue;
        };
        if !world.get::<Active>(entity).is_some_and(|a| a.0) {
            continue;
        }
        let Some(projectile) = world.get::<Projectile>(entity).cloned() else {
            continue;
        };
        // Spawned mid-frame: visible to queries, advanced next frame.
        if projectile.born_tick >= frame {
            continue;
        }
        let Some(shape) = world.get::<Shape>(entity).copied() else {
            continue;
        };
        let Some(mut pos) = world.get::<MapPosition>(entity).map(|p| p.pos) else {
            continue;
        };

        let total = projectile.speed * dt;
        if total <= 0.0 {
            continue;
        }

        let shooter = projectile
            .shooter
            .and_then(|owner| world.resource::<EntityIndex>().resolve(owner));
        let direction = projectile.direction();

        let mut travelled = projectile.distance_travelled;
        let mut remaining = total;
        let mut hit: Option<Entity> = None;
        let mut expired = false;

        while remaining > 0.0 {
            let step = remaining.min(max_step);
            pos += direction * step;
            travelled += step;
            remaining -= step;

            hit = scan_for_hit(world, entity, shooter, &shape, pos);
            if hit.is_some() {
                break;
            }
            if travelled >= projectile.max_range {
                expired = true;
                break;
            }
        }

        if let Some(mut position) = world.get_mut::<MapPosition>(entity) {
            position.pos = pos;
        }
        if let Some(mut state) = world.get_mut::<Projectile>(entity) {
            state.distance_travelled = travelled;
        }

        if let Some(target) = hit {
            // on_collision: damage once, then the projectile is spent.
            world.resource_mut::<Messages<DamageEvent>>().write(DamageEvent {
                target,
                amount: projectile.damage,
                source: Some(projectile.weapon),
            });
            debug!("projectile {id} hit {target:?} after {travelled:.1} units");
        }
        if hit.is_some() || expired {
            if let Some(mut active) = world.get_mut::<Active>(entity) {
                active.0 = false;
            }
        }
    }
}

/// First active solid entity overlapping the projectile's footprint at
/// `pos`, skipping the projectile itself and its shooter.
fn scan_for_hit(
    world: &World,
    projectile: Entity,
    shooter: Option<Entity>,
    shape: &Shape,
    pos: glam::Vec2,
) -> Option<Entity> {
    let index = world.resource::<EntityIndex>();
    for id in index.iter_order() {
        let Some(other) = index.resolve(id) else {
            continue;
        };
        if other == projectile || Some(other) == shooter {
            continue;
        }
        if !registry::blocks(world, other) {
            continue;
        }
        let (Some(other_shape), Some(other_pos)) = (
            world.get::<Shape>(other),
            world.get::<MapPosition>(other),
        ) else {
            continue;
        };
        if shape.intersects(pos, other_shape, other_pos.pos) {
            return Some(other);
        }
    }
    None
}
