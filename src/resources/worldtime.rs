//! Simulation clock resource.

use bevy_ecs::prelude::Resource;

/// Fixed-call-per-frame clock. The external driver supplies a
/// non-negative delta once per frame; a delta of exactly zero is valid
/// and must leave every position and timer unchanged.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct WorldTime {
    /// Seconds elapsed since the simulation started.
    pub elapsed: f32,
    /// Delta applied this frame, in seconds.
    pub delta: f32,
    /// Number of completed `tick` calls. Entities spawned during frame N
    /// carry N as their birth tick and are skipped by their own update
    /// system until frame N+1.
    pub frame_count: u64,
}
