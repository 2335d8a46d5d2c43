//! Combat resolution: reach tests and damage application.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;

use crate::components::flags::Active;
use crate::components::shape::Shape;
use crate::components::stats::StatBlock;
use crate::events::combat::DamageEvent;

/// Attack-range test: an enlarged copy of the attacker's shape — widths
/// grown by twice the range for rectangles, radius grown by the range
/// for circles — is intersected against the target's shape. A target
/// without a footprint falls back to a center-to-center distance check.
pub fn in_attack_reach(
    shape: &Shape,
    position: Vec2,
    attack_range: f32,
    target_shape: Option<&Shape>,
    target_position: Vec2,
) -> bool {
    match target_shape {
        Some(target_shape) => {
            shape
                .grown(attack_range)
                .intersects(position, target_shape, target_position)
        }
        None => position.distance(target_position) <= attack_range,
    }
}

/// Resolve queued damage through each target's defense. Inactive or
/// already-dead targets, and targets without a stat block, absorb
/// nothing and raise nothing — stale events are simply dropped.
pub fn apply_damage(
    mut messages: ResMut<Messages<DamageEvent>>,
    mut targets: Query<(&mut StatBlock, &Active)>,
) {
    for event in messages.drain() {
        let Ok((mut stats, active)) = targets.get_mut(event.target) else {
            continue;
        };
        if !active.0 || !stats.is_alive() {
            continue;
        }
        stats.take_damage(event.amount);
        if !stats.is_alive() {
            debug!("entity {:?} was killed", event.target);
        }
    }
}
