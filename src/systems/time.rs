//! Time update.

use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Advance the simulation clock by one frame. `dt` must be non-negative;
/// zero is valid and freezes all motion and timers for the frame.
pub fn update_world_time(world: &mut World, dt: f32) {
    debug_assert!(dt >= 0.0, "frame delta must be non-negative");
    let mut wt = world.resource_mut::<WorldTime>();
    wt.elapsed += dt;
    wt.delta = dt;
    wt.frame_count += 1;
}
