//! Range- and occlusion-filtered visibility for NPCs, plus hearing.
//!
//! For each perceiver, every other active entity within vision range is
//! a sight candidate; a candidate survives only if no other active
//! solid entity cuts the sight segment between them. This is O(visible
//! x total) per tick — a scaling ceiling, not an error. Hearing is a
//! bare distance check against the derived hearing range; occluders do
//! not muffle it.

use bevy_ecs::prelude::*;

use crate::components::brain::NpcBrain;
use crate::components::flags::{Active, Solid};
use crate::components::mapposition::MapPosition;
use crate::components::perception::{PerceivedQuarry, Perception};
use crate::components::shape::Shape;
use crate::components::stats::StatBlock;
use crate::registry::SimId;

pub fn perceive(
    mut perceivers: Query<(
        Entity,
        &MapPosition,
        &StatBlock,
        &NpcBrain,
        &Active,
        &mut Perception,
    )>,
    others: Query<(
        Entity,
        &SimId,
        &MapPosition,
        Option<&Shape>,
        Option<&StatBlock>,
        &Active,
        Has<Solid>,
    )>,
) {
    for (perceiver, position, stats, brain, active, mut perception) in perceivers.iter_mut() {
        perception.clear();
        if !active.0 || !stats.is_alive() {
            continue;
        }

        let eye = position.pos;
        let range = stats.vision_range();
        let earshot = stats.hearing_range();

        for (candidate, sim_id, cand_pos, cand_shape, cand_stats, cand_active, _) in others.iter() {
            if candidate == perceiver || !cand_active.0 {
                continue;
            }
            let distance = eye.distance(cand_pos.pos);
            if distance <= earshot {
                perception.audible.push(sim_id.0);
            }
            if distance > range {
                continue;
            }

            // Occlusion: any other active solid entity crossing the
            // sight segment hides the candidate.
            let mut occluded = false;
            for (occluder, _, occ_pos, occ_shape, occ_stats, occ_active, occ_solid) in others.iter()
            {
                if occluder == perceiver || occluder == candidate {
                    continue;
                }
                if !occ_active.0 || !occ_solid {
                    continue;
                }
                // Dead characters stop blocking sight lines.
                if occ_stats.is_some_and(|s| !s.is_alive()) {
                    continue;
                }
                let Some(shape) = occ_shape else {
                    continue;
                };
                if shape.segment_intersects(occ_pos.pos, eye, cand_pos.pos) {
                    occluded = true;
                    break;
                }
            }
            if occluded {
                continue;
            }

            perception.visible.push(sim_id.0);
            if brain.quarry == Some(sim_id.0) {
                perception.quarry = Some(PerceivedQuarry {
                    entity: candidate,
                    id: sim_id.0,
                    position: cand_pos.pos,
                    shape: cand_shape.copied(),
                    alive: cand_stats.map(StatBlock::is_alive).unwrap_or(true),
                });
            }
        }
    }
}
