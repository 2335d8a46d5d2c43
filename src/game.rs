//! High-level simulation assembly.
//!
//! [`Simulation`] owns the ECS [`World`] and the fixed per-tick
//! [`Schedule`], and exposes the boundary operations collaborators call
//! between ticks: spawning, movement probes, weapon handling, and
//! inventory commands. Systems never call these; they communicate
//! through components and [`Messages`].

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::Schedule;
use glam::Vec2;
use log::info;

use crate::components::mapposition::MapPosition;
use crate::components::velocity::Velocity;
use crate::components::weapon::{FireMode, Weapon};
use crate::error::SimError;
use crate::events::combat::{DamageEvent, WeaponFired};
use crate::registry::{self, EntityId, SpawnArgs};
use crate::resources::simconfig::SimConfig;
use crate::resources::worldtime::WorldTime;
use crate::systems::equipment;
use crate::systems::weapon::{self as weapon_sys, FireOutcome};
use crate::systems::{brain, combat, movement, perception, projectile, time};

/// Bevy ECS' [`Messages`] API requires calling `update()` once per frame
/// so unread messages survive exactly one extra tick before expiring.
fn expire_weapon_fired(mut messages: ResMut<Messages<WeaponFired>>) {
    messages.update();
}

pub struct Simulation {
    world: World,
    schedule: Schedule,
}

impl Simulation {
    /// Build a world with the standard resources and the fixed system
    /// chain. Order matters: perception feeds decisions, decisions feed
    /// movement, and damage resolves after every source has written.
    pub fn new(config: SimConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(config);
        world.insert_resource(Messages::<DamageEvent>::default());
        world.insert_resource(Messages::<WeaponFired>::default());
        registry::init_registry(&mut world);

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                perception::perceive,
                brain::think,
                movement::movement,
                weapon_sys::reload,
                projectile::fly,
                combat::apply_damage,
                expire_weapon_fired,
            )
                .chain(),
        );

        info!("simulation world initialized");
        Self { world, schedule }
    }

    /// Advance the simulation by one frame of `dt` seconds. A zero `dt`
    /// is valid and leaves positions and timers untouched.
    pub fn tick(&mut self, dt: f32) {
        time::update_world_time(&mut self.world, dt);
        self.schedule.run(&mut self.world);
    }

    pub fn elapsed(&self) -> f32 {
        self.world.resource::<WorldTime>().elapsed
    }

    // --- registry operations ---

    /// Spawn an entity of a registered kind from the catalog.
    pub fn create(&mut self, kind: &str, args: SpawnArgs) -> Result<EntityId, SimError> {
        registry::create(&mut self.world, kind, args)
    }

    /// Register an already-spawned ECS entity with the id index.
    pub fn add_existing(&mut self, entity: Entity) -> EntityId {
        registry::add_existing(&mut self.world, entity)
    }

    pub fn get_by_id(&self, id: EntityId) -> Result<Entity, SimError> {
        registry::get_by_id(&self.world, id)
    }

    pub fn remove_by_id(&mut self, id: EntityId) -> Result<(), SimError> {
        registry::remove_by_id(&mut self.world, id)
    }

    /// Snapshot of all registered ids in spawn order.
    pub fn all_entities(&self) -> Vec<EntityId> {
        registry::all_entities(&self.world)
    }

    pub fn purge_inactive(&mut self) {
        registry::purge_inactive(&mut self.world);
    }

    /// Side-effect-free test of whether `id` could occupy `candidate`.
    pub fn can_move(&self, id: EntityId, candidate: Vec2) -> Result<bool, SimError> {
        registry::can_move(&self.world, id, candidate)
    }

    // --- movement intent ---

    /// Set an entity's velocity for the coming frames. Collisions may
    /// still cancel or deflect the motion.
    pub fn set_velocity(&mut self, id: EntityId, velocity: Vec2) -> Result<(), SimError> {
        let entity = registry::get_by_id(&self.world, id)?;
        let Some(mut v) = self.world.get_mut::<Velocity>(entity) else {
            return Err(SimError::Usage(format!("entity {id} cannot move")));
        };
        v.set(velocity);
        Ok(())
    }

    pub fn position_of(&self, id: EntityId) -> Result<Vec2, SimError> {
        let entity = registry::get_by_id(&self.world, id)?;
        self.world
            .get::<MapPosition>(entity)
            .map(|p| p.pos)
            .ok_or_else(|| SimError::Usage(format!("entity {id} has no position")))
    }

    // --- weapon operations ---

    /// Fire one round from `weapon_id` towards `direction`, spawning
    /// the bullet at `origin`.
    pub fn fire(
        &mut self,
        weapon_id: EntityId,
        origin: Vec2,
        direction: Vec2,
    ) -> Result<FireOutcome, SimError> {
        weapon_sys::fire(&mut self.world, weapon_id, origin, direction)
    }

    pub fn start_reload(&mut self, weapon_id: EntityId) -> Result<(), SimError> {
        let mut weapon = self.weapon_mut(weapon_id)?;
        weapon.start_reload();
        Ok(())
    }

    pub fn cycle_fire_mode(&mut self, weapon_id: EntityId) -> Result<(), SimError> {
        let mut weapon = self.weapon_mut(weapon_id)?;
        weapon.cycle_fire_mode();
        Ok(())
    }

    /// Switch to a specific fire mode; unsupported modes are ignored.
    pub fn set_fire_mode(&mut self, weapon_id: EntityId, mode: FireMode) -> Result<(), SimError> {
        let mut weapon = self.weapon_mut(weapon_id)?;
        weapon.set_fire_mode(mode);
        Ok(())
    }

    fn weapon_mut(&mut self, weapon_id: EntityId) -> Result<Mut<'_, Weapon>, SimError> {
        let entity = registry::get_by_id(&self.world, weapon_id)?;
        self.world
            .get_mut::<Weapon>(entity)
            .ok_or_else(|| SimError::Usage(format!("entity {weapon_id} is not a weapon")))
    }

    // --- inventory operations ---

    pub fn collect_item(&mut self, collector: EntityId, item: EntityId) -> Result<(), SimError> {
        equipment::collect_item(&mut self.world, collector, item)
    }

    pub fn equip_weapon(&mut self, owner: EntityId, weapon: EntityId) -> Result<(), SimError> {
        equipment::equip_weapon(&mut self.world, owner, weapon)
    }

    pub fn equip_armor(
        &mut self,
        owner: EntityId,
        armor: EntityId,
        defense_bonus: f32,
    ) -> Result<(), SimError> {
        equipment::equip_armor(&mut self.world, owner, armor, defense_bonus)
    }

    pub fn unequip_weapon(&mut self, owner: EntityId) -> Result<(), SimError> {
        equipment::unequip_weapon(&mut self.world, owner)
    }

    // --- escape hatches for tests and embedding ---

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
