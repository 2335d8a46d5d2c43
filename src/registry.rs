//! Entity registry: the simulation's external boundary.
//!
//! The registry owns id assignment and answers the movement-validity
//! query. Ids start at 1, grow monotonically, and are never reused, even
//! after removal; the index also records insertion order so traversal
//! snapshots are stable. Spawning goes through a string-keyed
//! [`SpawnCatalog`] so the excluded level-loading layer can create
//! entities without naming concrete component bundles.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;
use rustc_hash::FxHashMap;

use crate::components::brain::{Attitude, DecisionStrategy, HostileStrategy, NpcBrain};
use crate::components::flags::{Active, Collectable, Solid};
use crate::components::inventory::Inventory;
use crate::components::item::Item;
use crate::components::mapposition::MapPosition;
use crate::components::perception::Perception;
use crate::components::shape::Shape;
use crate::components::stats::StatBlock;
use crate::components::velocity::Velocity;
use crate::components::weapon::{FireMode, Weapon};
use crate::error::SimError;

/// Stable simulation-level entity id, distinct from the ECS row handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    pub fn raw(self) -> u64 {
        self.0
    }

    pub fn from_raw(raw: u64) -> Self {
        EntityId(raw)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Back-pointer from an ECS entity to its registry id.
#[derive(Component, Clone, Copy, Debug)]
pub struct SimId(pub EntityId);

/// Id assignment and lookup state.
#[derive(Resource, Debug)]
pub struct EntityIndex {
    next_id: u64,
    by_id: FxHashMap<EntityId, Entity>,
    order: Vec<EntityId>,
}

impl Default for EntityIndex {
    fn default() -> Self {
        Self {
            next_id: 1,
            by_id: FxHashMap::default(),
            order: Vec::new(),
        }
    }
}

impl EntityIndex {
    fn allocate(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.by_id.insert(id, entity);
        self.order.push(id);
        id
    }

    fn forget(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.by_id.remove(&id)?;
        self.order.retain(|i| *i != id);
        Some(entity)
    }

    pub fn resolve(&self, id: EntityId) -> Option<Entity> {
        self.by_id.get(&id).copied()
    }

    /// Registered ids in insertion order.
    pub fn iter_order(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// ---------------------------------------------------------------------
// Spawn catalog
// ---------------------------------------------------------------------

/// Stat section of a spawn request.
#[derive(Clone, Copy, Debug)]
pub struct StatSpec {
    pub max_health: f32,
    pub speed: f32,
    pub attack: f32,
    pub defense: f32,
    pub vision_range: f32,
    pub hearing_range: f32,
    pub attack_range: f32,
}

/// Brain section of a spawn request. Without an explicit strategy the
/// reference hostile strategy is used.
pub struct BrainSpec {
    pub attitude: Attitude,
    pub attack_rate: f32,
    pub quarry: Option<EntityId>,
    pub strategy: Option<Box<dyn DecisionStrategy>>,
}

/// Weapon section of a spawn request.
#[derive(Clone, Debug)]
pub struct WeaponSpec {
    pub firing_range: f32,
    pub bullet_speed: f32,
    pub attack_power: f32,
    pub reload_time: f32,
    pub firing_rate: f32,
    pub magazine_capacity: u32,
    pub fire_modes: Vec<FireMode>,
}

/// Item section of a spawn request.
#[derive(Clone, Debug)]
pub struct ItemSpec {
    pub description: String,
    pub stackable: bool,
    pub quantity: u32,
}

/// Arguments for a catalog spawn. Sections a kind does not need are
/// ignored; sections it requires but misses are a construction error.
pub struct SpawnArgs {
    pub pos: Vec2,
    pub shape: Shape,
    pub name: String,
    pub stats: Option<StatSpec>,
    pub brain: Option<BrainSpec>,
    pub weapon: Option<WeaponSpec>,
    pub item: Option<ItemSpec>,
}

impl SpawnArgs {
    pub fn new(pos: Vec2, shape: Shape, name: impl Into<String>) -> Self {
        Self {
            pos,
            shape,
            name: name.into(),
            stats: None,
            brain: None,
            weapon: None,
            item: None,
        }
    }

    pub fn with_stats(mut self, stats: StatSpec) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_brain(mut self, brain: BrainSpec) -> Self {
        self.brain = Some(brain);
        self
    }

    pub fn with_weapon(mut self, weapon: WeaponSpec) -> Self {
        self.weapon = Some(weapon);
        self
    }

    pub fn with_item(mut self, item: ItemSpec) -> Self {
        self.item = Some(item);
        self
    }
}

type SpawnFn = fn(&mut World, SpawnArgs) -> Result<Entity, SimError>;

/// String key to spawn function mapping.
#[derive(Resource, Default)]
pub struct SpawnCatalog {
    kinds: FxHashMap<String, SpawnFn>,
}

impl SpawnCatalog {
    /// Catalog with the built-in kinds registered: `wall`, `character`,
    /// `npc`, `item`, `weapon`.
    pub fn with_defaults() -> Self {
        let mut catalog = Self::default();
        // Registration of built-ins cannot collide.
        catalog.register("wall", spawn_wall).unwrap();
        catalog.register("character", spawn_character).unwrap();
        catalog.register("npc", spawn_npc).unwrap();
        catalog.register("item", spawn_item).unwrap();
        catalog.register("weapon", spawn_weapon).unwrap();
        catalog
    }

    /// Register a spawn kind. Re-registering an existing key is a usage
    /// error.
    pub fn register(&mut self, key: impl Into<String>, f: SpawnFn) -> Result<(), SimError> {
        let key = key.into();
        if self.kinds.contains_key(&key) {
            return Err(SimError::Usage(format!(
                "spawn kind '{key}' already registered"
            )));
        }
        self.kinds.insert(key, f);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<SpawnFn, SimError> {
        self.kinds
            .get(key)
            .copied()
            .ok_or_else(|| SimError::Lookup(format!("unknown spawn kind '{key}'")))
    }

    pub fn registered_keys(&self) -> Vec<&str> {
        self.kinds.keys().map(String::as_str).collect()
    }
}

fn require<T>(section: Option<T>, kind: &str, what: &str) -> Result<T, SimError> {
    section.ok_or_else(|| SimError::Construction(format!("kind '{kind}' requires a {what} section")))
}

fn stat_block(spec: StatSpec) -> StatBlock {
    StatBlock::new(
        spec.max_health,
        spec.speed,
        spec.attack,
        spec.defense,
        spec.vision_range,
        spec.hearing_range,
    )
    .with_attack_range(spec.attack_range)
}

fn spawn_wall(world: &mut World, args: SpawnArgs) -> Result<Entity, SimError> {
    Ok(world
        .spawn((MapPosition::at(args.pos), args.shape, Active(true), Solid))
        .id())
}

fn spawn_character(world: &mut World, args: SpawnArgs) -> Result<Entity, SimError> {
    let stats = require(args.stats, "character", "stats")?;
    Ok(world
        .spawn((
            MapPosition::at(args.pos),
            args.shape,
            Active(true),
            Solid,
            stat_block(stats),
            Velocity::zero(),
            Inventory::new(),
        ))
        .id())
}

fn spawn_npc(world: &mut World, args: SpawnArgs) -> Result<Entity, SimError> {
    let stats = require(args.stats, "npc", "stats")?;
    let brain = require(args.brain, "npc", "brain")?;
    let strategy = brain
        .strategy
        .unwrap_or_else(|| Box::new(HostileStrategy::new()));
    let mut npc_brain = NpcBrain::new(args.name, brain.attitude, strategy, brain.attack_rate);
    npc_brain.quarry = brain.quarry;
    Ok(world
        .spawn((
            MapPosition::at(args.pos),
            args.shape,
            Active(true),
            Solid,
            stat_block(stats),
            Velocity::zero(),
            npc_brain,
            Perception::default(),
        ))
        .id())
}

fn spawn_item(world: &mut World, args: SpawnArgs) -> Result<Entity, SimError> {
    let spec = require(args.item, "item", "item")?;
    let item = Item {
        name: args.name,
        description: spec.description,
        stackable: spec.stackable,
        quantity: spec.quantity,
    };
    Ok(world
        .spawn((
            MapPosition::at(args.pos),
            args.shape,
            Active(true),
            Collectable,
            item,
        ))
        .id())
}

fn spawn_weapon(world: &mut World, args: SpawnArgs) -> Result<Entity, SimError> {
    let item_spec = require(args.item, "weapon", "item")?;
    let spec = require(args.weapon, "weapon", "weapon")?;
    let item = Item {
        name: args.name,
        description: item_spec.description,
        stackable: false,
        quantity: 1,
    };
    let weapon = Weapon::new(
        spec.firing_range,
        spec.bullet_speed,
        spec.attack_power,
        spec.reload_time,
        spec.firing_rate,
        spec.magazine_capacity,
        &spec.fire_modes,
    );
    Ok(world
        .spawn((
            MapPosition::at(args.pos),
            args.shape,
            Active(true),
            Collectable,
            item,
            weapon,
        ))
        .id())
}

// ---------------------------------------------------------------------
// Registry operations
// ---------------------------------------------------------------------

/// Insert the registry resources into a fresh world.
pub fn init_registry(world: &mut World) {
    world.init_resource::<EntityIndex>();
    world.insert_resource(SpawnCatalog::with_defaults());
}

/// Create an entity through the spawn catalog and assign it a fresh id.
/// Unknown kinds fail with a lookup error; a kind missing a required
/// args section fails with a construction error.
pub fn create(world: &mut World, kind: &str, args: SpawnArgs) -> Result<EntityId, SimError> {
    let spawn = world.resource::<SpawnCatalog>().get(kind)?;
    let entity = spawn(world, args)?;
    let id = register(world, entity);
    debug!("created '{kind}' as entity {id}");
    Ok(id)
}

/// Register a pre-constructed ECS entity: assigns the next id and stores
/// it in the index.
pub fn add_existing(world: &mut World, entity: Entity) -> EntityId {
    register(world, entity)
}

fn register(world: &mut World, entity: Entity) -> EntityId {
    let id = world.resource_mut::<EntityIndex>().allocate(entity);
    world.entity_mut(entity).insert(SimId(id));
    id
}

/// Resolve an id to its ECS entity handle.
pub fn get_by_id(world: &World, id: EntityId) -> Result<Entity, SimError> {
    world
        .resource::<EntityIndex>()
        .resolve(id)
        .ok_or_else(|| SimError::Lookup(format!("entity id {id} not found")))
}

/// Despawn an entity and drop it from the index. Its id is never reused.
pub fn remove_by_id(world: &mut World, id: EntityId) -> Result<(), SimError> {
    let entity = world
        .resource_mut::<EntityIndex>()
        .forget(id)
        .ok_or_else(|| SimError::Lookup(format!("entity id {id} not found")))?;
    world.despawn(entity);
    Ok(())
}

/// Point-in-time snapshot of all registered ids in insertion order.
/// Additions and removals after the call do not affect the returned
/// list, so it is safe to mutate the registry while traversing it.
pub fn all_entities(world: &World) -> Vec<EntityId> {
    world.resource::<EntityIndex>().order.clone()
}

/// Remove every entity whose active flag has been cleared.
pub fn purge_inactive(world: &mut World) {
    let stale: Vec<EntityId> = all_entities(world)
        .into_iter()
        .filter(|id| {
            world
                .resource::<EntityIndex>()
                .resolve(*id)
                .and_then(|e| world.get::<Active>(e))
                .is_some_and(|a| !a.0)
        })
        .collect();
    for id in stale {
        // The id came from a live snapshot; removal cannot fail.
        let _ = remove_by_id(world, id);
    }
}

/// Does this entity currently block movement and line of sight?
/// Requires the active flag, the solid marker, and, for characters, being
/// alive: corpses stop blocking.
pub(crate) fn blocks(world: &World, entity: Entity) -> bool {
    if !world.get::<Active>(entity).is_some_and(|a| a.0) {
        return false;
    }
    if world.get::<Solid>(entity).is_none() {
        return false;
    }
    world
        .get::<StatBlock>(entity)
        .map(|s| s.is_alive())
        .unwrap_or(true)
}

/// Movement-validity query: may `id` occupy `candidate` without
/// intersecting another active, solid entity?
///
/// The entity's position is never touched; the footprint is evaluated
/// directly at the candidate point, so the query is side-effect-free on
/// every path by construction.
pub fn can_move(world: &World, id: EntityId, candidate: Vec2) -> Result<bool, SimError> {
    let subject = get_by_id(world, id)?;
    let Some(shape) = world.get::<Shape>(subject).copied() else {
        // No footprint, nothing to collide with.
        return Ok(true);
    };

    let index = world.resource::<EntityIndex>();
    for other_id in &index.order {
        let Some(other) = index.resolve(*other_id) else {
            continue;
        };
        if other == subject || !blocks(world, other) {
            continue;
        }
        let (Some(other_shape), Some(other_pos)) = (
            world.get::<Shape>(other),
            world.get::<MapPosition>(other),
        ) else {
            continue;
        };
        if shape.intersects(candidate, other_shape, other_pos.pos) {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        let mut world = World::new();
        init_registry(&mut world);
        world
    }

    fn wall_args(x: f32, y: f32) -> SpawnArgs {
        SpawnArgs::new(Vec2::new(x, y), Shape::rect(10.0, 10.0), "wall")
    }

    #[test]
    fn ids_start_at_one_and_grow_monotonically() {
        let mut w = world();
        let a = create(&mut w, "wall", wall_args(0.0, 0.0)).unwrap();
        let b = create(&mut w, "wall", wall_args(20.0, 0.0)).unwrap();
        assert_eq!(a.raw(), 1);
        assert_eq!(b.raw(), 2);
    }

    #[test]
    fn removed_ids_are_never_reused() {
        let mut w = world();
        let a = create(&mut w, "wall", wall_args(0.0, 0.0)).unwrap();
        remove_by_id(&mut w, a).unwrap();
        let b = create(&mut w, "wall", wall_args(0.0, 0.0)).unwrap();
        assert_eq!(b.raw(), 2);
    }

    #[test]
    fn unknown_kind_is_lookup_error() {
        let mut w = world();
        let err = create(&mut w, "dragon", wall_args(0.0, 0.0)).unwrap_err();
        assert!(matches!(err, SimError::Lookup(_)));
    }

    #[test]
    fn missing_required_section_is_construction_error() {
        let mut w = world();
        let args = SpawnArgs::new(Vec2::ZERO, Shape::circle(5.0), "grunt");
        let err = create(&mut w, "npc", args).unwrap_err();
        assert!(matches!(err, SimError::Construction(_)));
    }

    #[test]
    fn get_and_remove_unknown_id_are_lookup_errors() {
        let mut w = world();
        let ghost = EntityId::from_raw(99);
        assert!(matches!(get_by_id(&w, ghost), Err(SimError::Lookup(_))));
        assert!(matches!(
            remove_by_id(&mut w, ghost),
            Err(SimError::Lookup(_))
        ));
    }

    #[test]
    fn add_existing_assigns_next_id() {
        let mut w = world();
        create(&mut w, "wall", wall_args(0.0, 0.0)).unwrap();
        let loose = w.spawn((MapPosition::new(5.0, 5.0), Active(true))).id();
        let id = add_existing(&mut w, loose);
        assert_eq!(id.raw(), 2);
        assert_eq!(get_by_id(&w, id).unwrap(), loose);
        assert_eq!(w.get::<SimId>(loose).unwrap().0, id);
    }

    #[test]
    fn snapshot_is_insertion_ordered_and_detached() {
        let mut w = world();
        let a = create(&mut w, "wall", wall_args(0.0, 0.0)).unwrap();
        let b = create(&mut w, "wall", wall_args(20.0, 0.0)).unwrap();
        let snapshot = all_entities(&w);
        remove_by_id(&mut w, a).unwrap();
        // The earlier snapshot is unaffected by the removal.
        assert_eq!(snapshot, vec![a, b]);
        assert_eq!(all_entities(&w), vec![b]);
    }

    #[test]
    fn can_move_detects_blocked_and_free_positions() {
        let mut w = world();
        let mover = create(&mut w, "wall", wall_args(0.0, 0.0)).unwrap();
        create(&mut w, "wall", wall_args(20.0, 0.0)).unwrap();
        assert!(!can_move(&w, mover, Vec2::new(15.0, 0.0)).unwrap());
        assert!(can_move(&w, mover, Vec2::new(0.0, 30.0)).unwrap());
        // Edge-touching rectangles do not collide.
        assert!(can_move(&w, mover, Vec2::new(10.0, 0.0)).unwrap());
    }

    #[test]
    fn can_move_never_mutates_position() {
        let mut w = world();
        let mover = create(&mut w, "wall", wall_args(0.0, 0.0)).unwrap();
        create(&mut w, "wall", wall_args(20.0, 0.0)).unwrap();
        let entity = get_by_id(&w, mover).unwrap();
        let before = w.get::<MapPosition>(entity).unwrap().pos;
        for _ in 0..5 {
            let _ = can_move(&w, mover, Vec2::new(15.0, 0.0)).unwrap();
            let _ = can_move(&w, mover, Vec2::new(100.0, 100.0)).unwrap();
        }
        let after = w.get::<MapPosition>(entity).unwrap().pos;
        assert_eq!(before.to_array(), after.to_array());
    }

    #[test]
    fn inactive_solids_do_not_block() {
        let mut w = world();
        let mover = create(&mut w, "wall", wall_args(0.0, 0.0)).unwrap();
        let blocker = create(&mut w, "wall", wall_args(20.0, 0.0)).unwrap();
        let blocker_entity = get_by_id(&w, blocker).unwrap();
        w.get_mut::<Active>(blocker_entity).unwrap().0 = false;
        assert!(can_move(&w, mover, Vec2::new(15.0, 0.0)).unwrap());
    }

    #[test]
    fn purge_inactive_drops_only_flagged_entities() {
        let mut w = world();
        let a = create(&mut w, "wall", wall_args(0.0, 0.0)).unwrap();
        let b = create(&mut w, "wall", wall_args(20.0, 0.0)).unwrap();
        let a_entity = get_by_id(&w, a).unwrap();
        w.get_mut::<Active>(a_entity).unwrap().0 = false;
        purge_inactive(&mut w);
        assert!(get_by_id(&w, a).is_err());
        assert!(get_by_id(&w, b).is_ok());
    }
}
