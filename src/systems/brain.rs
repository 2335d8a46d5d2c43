//! NPC decision step: decide a movement target, steer, swing when close.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;

use crate::components::brain::{Attitude, DecisionContext, NpcBrain};
use crate::components::flags::Active;
use crate::components::mapposition::MapPosition;
use crate::components::perception::Perception;
use crate::components::shape::Shape;
use crate::components::stats::StatBlock;
use crate::components::velocity::Velocity;
use crate::events::combat::DamageEvent;
use crate::registry::SimId;
use crate::resources::simconfig::SimConfig;
use crate::resources::worldtime::WorldTime;
use crate::systems::combat;

pub fn think(
    time: Res<WorldTime>,
    config: Res<SimConfig>,
    mut npcs: Query<(
        &SimId,
        &mut NpcBrain,
        &Perception,
        &MapPosition,
        &Shape,
        &StatBlock,
        &Active,
        &mut Velocity,
    )>,
    mut damage: MessageWriter<DamageEvent>,
) {
    for (sim_id, mut brain, perception, position, shape, stats, active, mut velocity) in
        npcs.iter_mut()
    {
        if !active.0 || !stats.is_alive() {
            velocity.0 = Vec2::ZERO;
            continue;
        }

        brain.tick_cooldown(time.delta);

        // A dead quarry is treated as absent, not chased.
        let quarry = perception.quarry.filter(|q| q.alive);

        let ctx = DecisionContext {
            position: position.pos,
            quarry_position: quarry.map(|q| q.position),
            arrival_threshold: config.arrival_threshold,
            wander: config.wander,
        };
        let target = brain.strategy.decide(&ctx);
        brain.move_target = target;

        velocity.0 = match target {
            Some(goal) if position.distance_to(goal) > config.arrival_threshold => {
                (goal - position.pos).normalize_or_zero() * stats.speed()
            }
            _ => Vec2::ZERO,
        };

        // Melee swing against a visible quarry in reach.
        if brain.attitude != Attitude::Hostile || !brain.able_to_attack {
            continue;
        }
        let Some(quarry) = quarry else {
            continue;
        };
        if combat::in_attack_reach(
            shape,
            position.pos,
            stats.attack_range(),
            quarry.shape.as_ref(),
            quarry.position,
        ) {
            debug!("npc {} ({}) attacks {}", sim_id.0, brain.name, quarry.id);
            damage.write(DamageEvent {
                target: quarry.entity,
                amount: stats.attack(),
                source: Some(sim_id.0),
            });
            brain.latch_attack();
        }
    }
}
