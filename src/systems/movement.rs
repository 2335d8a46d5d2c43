//! Collision-aware movement resolution.
//!
//! Entities are visited in registry insertion order over a pre-taken
//! snapshot, and each probe runs against live world state, so an entity
//! committed earlier in the frame blocks one probing later in the same
//! frame.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::flags::Active;
use crate::components::mapposition::MapPosition;
use crate::components::velocity::Velocity;
use crate::registry;
use crate::resources::worldtime::WorldTime;

/// Resolve each mover's desired displacement against the collision
/// world with axis sliding:
///
/// 1. Probe the full diagonal step; commit on success.
/// 2. Otherwise probe single axes, larger absolute displacement first —
///    the ordering matters for wall hugging.
/// 3. Commit the first successful probe; the facing angle follows the
///    committed displacement, never the requested one.
/// 4. If everything is blocked, zero this tick's velocity and stay put.
///    No stuck state persists into the next tick.
pub fn movement(world: &mut World) {
    let dt = world.resource::<WorldTime>().delta;

    for id in registry::all_entities(world) {
        let Ok(entity) = registry::get_by_id(world, id) else {
            continue;
        };
        if !world.get::<Active>(entity).is_some_and(|a| a.0) {
            continue;
        }
        let Some(velocity) = world.get::<Velocity>(entity).copied() else {
            continue;
        };
        let step = velocity.0 * dt;
        if step == Vec2::ZERO {
            continue;
        }
        let Some(origin) = world.get::<MapPosition>(entity).map(|p| p.pos) else {
            continue;
        };

        // Full diagonal step.
        if registry::can_move(world, id, origin + step).unwrap_or(false) {
            commit(world, entity, origin + step, step);
            continue;
        }

        // Single-axis probes, dominant axis first.
        let x_step = Vec2::new(step.x, 0.0);
        let y_step = Vec2::new(0.0, step.y);
        let probes = if step.x.abs() >= step.y.abs() {
            [x_step, y_step]
        } else {
            [y_step, x_step]
        };

        let mut committed = false;
        for axis_step in probes {
            if axis_step == Vec2::ZERO {
                continue;
            }
            if registry::can_move(world, id, origin + axis_step).unwrap_or(false) {
                commit(world, entity, origin + axis_step, axis_step);
                committed = true;
                break;
            }
        }

        if !committed {
            if let Some(mut v) = world.get_mut::<Velocity>(entity) {
                v.0 = Vec2::ZERO;
            }
        }
    }
}

fn commit(world: &mut World, entity: Entity, new_pos: Vec2, moved: Vec2) {
    if let Some(mut position) = world.get_mut::<MapPosition>(entity) {
        position.pos = new_pos;
        position.angle = moved.to_angle();
    }
}
