//! Magazine, reload, fire-mode, and equipment behavior through the
//! simulation boundary.

use glam::Vec2;

use arenasim::components::item::Item;
use arenasim::components::shape::Shape;
use arenasim::components::stats::StatBlock;
use arenasim::components::weapon::{FireMode, ReloadState, Weapon};
use arenasim::game::Simulation;
use arenasim::registry::{EntityId, ItemSpec, SpawnArgs, StatSpec, WeaponSpec};
use arenasim::resources::simconfig::SimConfig;
use arenasim::systems::weapon::FireOutcome;

fn sim() -> Simulation {
    Simulation::new(SimConfig::default())
}

fn pistol_spec(capacity: u32, modes: Vec<FireMode>) -> WeaponSpec {
    WeaponSpec {
        firing_range: 200.0,
        bullet_speed: 300.0,
        attack_power: 15.0,
        reload_time: 2.0,
        firing_rate: 2.0,
        magazine_capacity: capacity,
        fire_modes: modes,
    }
}

fn spawn_pistol(sim: &mut Simulation, capacity: u32, modes: Vec<FireMode>) -> EntityId {
    sim.create(
        "weapon",
        SpawnArgs::new(Vec2::new(50.0, 50.0), Shape::rect(6.0, 3.0), "pistol")
            .with_item(ItemSpec {
                description: "sidearm".into(),
                stackable: false,
                quantity: 1,
            })
            .with_weapon(pistol_spec(capacity, modes)),
    )
    .unwrap()
}

fn soldier_stats() -> StatSpec {
    StatSpec {
        max_health: 100.0,
        speed: 100.0,
        attack: 5.0,
        defense: 2.0,
        vision_range: 300.0,
        hearing_range: 400.0,
        attack_range: 5.0,
    }
}

fn ammo_of(sim: &Simulation, weapon: EntityId) -> u32 {
    let entity = sim.get_by_id(weapon).unwrap();
    sim.world().get::<Weapon>(entity).unwrap().current_ammo()
}

#[test]
fn magazine_empties_reloads_and_restocks_to_capacity() {
    let mut sim = sim();
    let pistol = spawn_pistol(&mut sim, 3, vec![FireMode::Single]);

    for _ in 0..3 {
        let outcome = sim.fire(pistol, Vec2::ZERO, Vec2::X).unwrap();
        assert!(matches!(outcome, FireOutcome::Fired(_)));
    }
    // Emptying the magazine auto-starts the reload.
    let entity = sim.get_by_id(pistol).unwrap();
    assert_eq!(
        sim.world().get::<Weapon>(entity).unwrap().state(),
        ReloadState::Reloading
    );

    // Trigger pulls during the reload are refused without side effects.
    assert_eq!(
        sim.fire(pistol, Vec2::ZERO, Vec2::X).unwrap(),
        FireOutcome::Reloading
    );

    // 2.0 seconds of reload at 0.5 per tick.
    for _ in 0..4 {
        sim.tick(0.5);
    }
    assert_eq!(ammo_of(&sim, pistol), 3);
    assert_eq!(
        sim.world()
            .get::<Weapon>(sim.get_by_id(pistol).unwrap())
            .unwrap()
            .state(),
        ReloadState::Ready
    );

    let outcome = sim.fire(pistol, Vec2::ZERO, Vec2::X).unwrap();
    assert!(matches!(outcome, FireOutcome::Fired(_)));
    assert_eq!(ammo_of(&sim, pistol), 2);
}

#[test]
fn zero_dt_does_not_advance_the_reload_timer() {
    let mut sim = sim();
    let pistol = spawn_pistol(&mut sim, 3, vec![FireMode::Single]);

    sim.start_reload(pistol).unwrap();

    let state = |sim: &Simulation| {
        sim.world()
            .get::<Weapon>(sim.get_by_id(pistol).unwrap())
            .unwrap()
            .state()
    };

    // Any number of frozen frames leaves the reload where it was.
    for _ in 0..10 {
        sim.tick(0.0);
    }
    assert_eq!(state(&sim), ReloadState::Reloading);

    // The reload still needs its full 2.0 seconds of real time.
    for _ in 0..3 {
        sim.tick(0.5);
    }
    assert_eq!(state(&sim), ReloadState::Reloading);
    sim.tick(0.5);
    assert_eq!(state(&sim), ReloadState::Ready);
    assert_eq!(ammo_of(&sim, pistol), 3);
}

#[test]
fn last_round_fire_starts_the_auto_reload() {
    let mut sim = sim();
    let pistol = spawn_pistol(&mut sim, 1, vec![FireMode::Single]);

    assert!(matches!(
        sim.fire(pistol, Vec2::ZERO, Vec2::X).unwrap(),
        FireOutcome::Fired(_)
    ));
    // Last-round fire already started the reload, so the next pull
    // reports Reloading rather than Empty.
    assert_eq!(
        sim.fire(pistol, Vec2::ZERO, Vec2::X).unwrap(),
        FireOutcome::Reloading
    );
}

#[test]
fn fire_mode_cycles_and_ignores_unsupported_requests() {
    let mut sim = sim();
    let pistol = spawn_pistol(&mut sim, 10, vec![FireMode::Single, FireMode::Auto]);
    let entity = sim.get_by_id(pistol).unwrap();

    let mode = |sim: &Simulation| {
        sim.world()
            .get::<Weapon>(entity)
            .unwrap()
            .current_fire_mode()
    };

    assert_eq!(mode(&sim), FireMode::Single);
    sim.cycle_fire_mode(pistol).unwrap();
    assert_eq!(mode(&sim), FireMode::Auto);
    sim.cycle_fire_mode(pistol).unwrap();
    assert_eq!(mode(&sim), FireMode::Single);

    // Burst is not supported by this weapon; the request is ignored.
    sim.set_fire_mode(pistol, FireMode::Burst).unwrap();
    assert_eq!(mode(&sim), FireMode::Single);
    sim.set_fire_mode(pistol, FireMode::Auto).unwrap();
    assert_eq!(mode(&sim), FireMode::Auto);
}

#[test]
fn equipping_weapons_swaps_attack_modifiers() {
    let mut sim = sim();
    let soldier = sim
        .create(
            "character",
            SpawnArgs::new(Vec2::ZERO, Shape::rect(24.0, 24.0), "soldier")
                .with_stats(soldier_stats()),
        )
        .unwrap();
    let pistol = spawn_pistol(&mut sim, 10, vec![FireMode::Single]);

    let attack = |sim: &Simulation| {
        let entity = sim.get_by_id(soldier).unwrap();
        sim.world().get::<StatBlock>(entity).unwrap().attack()
    };

    assert_eq!(attack(&sim), 5.0);

    sim.collect_item(soldier, pistol).unwrap();
    sim.equip_weapon(soldier, pistol).unwrap();
    assert_eq!(attack(&sim), 20.0); // 5 base + 15 weapon

    sim.unequip_weapon(soldier).unwrap();
    assert_eq!(attack(&sim), 5.0);
}

#[test]
fn equipping_unowned_weapon_is_refused() {
    let mut sim = sim();
    let soldier = sim
        .create(
            "character",
            SpawnArgs::new(Vec2::ZERO, Shape::rect(24.0, 24.0), "soldier")
                .with_stats(soldier_stats()),
        )
        .unwrap();
    let pistol = spawn_pistol(&mut sim, 10, vec![FireMode::Single]);

    assert!(sim.equip_weapon(soldier, pistol).is_err());
}

#[test]
fn stackable_items_merge_on_collection() {
    let mut sim = sim();
    let soldier = sim
        .create(
            "character",
            SpawnArgs::new(Vec2::ZERO, Shape::rect(24.0, 24.0), "soldier")
                .with_stats(soldier_stats()),
        )
        .unwrap();

    let spawn_ammo = |sim: &mut Simulation, x: f32, quantity: u32| {
        sim.create(
            "item",
            SpawnArgs::new(Vec2::new(x, 0.0), Shape::rect(4.0, 4.0), "ammo box").with_item(
                ItemSpec {
                    description: "rifle rounds".into(),
                    stackable: true,
                    quantity,
                },
            ),
        )
        .unwrap()
    };

    let first = spawn_ammo(&mut sim, 40.0, 12);
    let second = spawn_ammo(&mut sim, 60.0, 8);

    sim.collect_item(soldier, first).unwrap();
    sim.collect_item(soldier, second).unwrap();

    // The second box merged into the first and its entity is gone.
    assert!(sim.get_by_id(second).is_err());
    let first_entity = sim.get_by_id(first).unwrap();
    assert_eq!(sim.world().get::<Item>(first_entity).unwrap().quantity, 20);
}
