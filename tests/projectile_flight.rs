//! Projectile flight, impact, and expiry through full simulation ticks.

use glam::Vec2;

use arenasim::components::flags::Active;
use arenasim::components::mapposition::MapPosition;
use arenasim::components::projectile::{Bullet, Projectile};
use arenasim::components::shape::Shape;
use arenasim::components::stats::StatBlock;
use arenasim::components::weapon::FireMode;
use arenasim::game::Simulation;
use arenasim::registry::{EntityId, ItemSpec, SpawnArgs, StatSpec, WeaponSpec};
use arenasim::resources::simconfig::SimConfig;
use arenasim::systems::weapon::FireOutcome;

fn sim() -> Simulation {
    Simulation::new(SimConfig::default())
}

fn rifle_spec(range: f32, speed: f32, power: f32) -> WeaponSpec {
    WeaponSpec {
        firing_range: range,
        bullet_speed: speed,
        attack_power: power,
        reload_time: 2.0,
        firing_rate: 4.0,
        magazine_capacity: 30,
        fire_modes: vec![FireMode::Single],
    }
}

fn spawn_rifle(sim: &mut Simulation, range: f32, speed: f32, power: f32) -> EntityId {
    sim.create(
        "weapon",
        SpawnArgs::new(Vec2::new(-50.0, -50.0), Shape::rect(8.0, 3.0), "rifle")
            .with_item(ItemSpec {
                description: "test rifle".into(),
                stackable: false,
                quantity: 1,
            })
            .with_weapon(rifle_spec(range, speed, power)),
    )
    .unwrap()
}

fn target_stats(defense: f32) -> StatSpec {
    StatSpec {
        max_health: 100.0,
        speed: 0.0,
        attack: 0.0,
        defense,
        vision_range: 100.0,
        hearing_range: 100.0,
        attack_range: 5.0,
    }
}

#[test]
fn bullet_damages_target_exactly_once_and_is_spent() {
    let mut sim = sim();
    let target = sim
        .create(
            "character",
            SpawnArgs::new(Vec2::new(100.0, -12.0), Shape::rect(24.0, 24.0), "target")
                .with_stats(target_stats(2.0)),
        )
        .unwrap();
    let rifle = spawn_rifle(&mut sim, 400.0, 100.0, 15.0);

    let FireOutcome::Fired(bullet) = sim.fire(rifle, Vec2::ZERO, Vec2::X).unwrap() else {
        panic!("expected a bullet");
    };

    // 100 units at 100 u/s: the impact lands within 11 frames.
    for _ in 0..11 {
        sim.tick(0.1);
    }

    let target_entity = sim.get_by_id(target).unwrap();
    let health = sim.world().get::<StatBlock>(target_entity).unwrap().health();
    assert_eq!(health, 87.0); // 15 attack through 2 defense

    let bullet_entity = sim.get_by_id(bullet).unwrap();
    assert!(!sim.world().get::<Active>(bullet_entity).unwrap().0);

    // A spent bullet never damages again.
    for _ in 0..20 {
        sim.tick(0.1);
    }
    let health = sim.world().get::<StatBlock>(target_entity).unwrap().health();
    assert_eq!(health, 87.0);
}

#[test]
fn bullet_expires_at_firing_range() {
    let mut sim = sim();
    let rifle = spawn_rifle(&mut sim, 50.0, 100.0, 15.0);

    let FireOutcome::Fired(bullet) = sim.fire(rifle, Vec2::ZERO, Vec2::X).unwrap() else {
        panic!("expected a bullet");
    };

    for _ in 0..5 {
        sim.tick(0.1);
    }

    let bullet_entity = sim.get_by_id(bullet).unwrap();
    let flown = sim.world().get::<Projectile>(bullet_entity).unwrap();
    assert!(flown.distance_travelled >= 50.0);
    assert!(!sim.world().get::<Active>(bullet_entity).unwrap().0);

    sim.purge_inactive();
    assert!(sim.get_by_id(bullet).is_err());
}

#[test]
fn bullet_never_hits_its_shooter() {
    let mut sim = sim();
    let shooter = sim
        .create(
            "character",
            SpawnArgs::new(Vec2::new(-12.0, -12.0), Shape::rect(24.0, 24.0), "shooter")
                .with_stats(target_stats(0.0)),
        )
        .unwrap();
    let rifle = spawn_rifle(&mut sim, 400.0, 100.0, 15.0);
    sim.collect_item(shooter, rifle).unwrap();
    sim.equip_weapon(shooter, rifle).unwrap();

    // The bullet spawns inside the shooter's own footprint.
    let outcome = sim.fire(rifle, Vec2::ZERO, Vec2::X).unwrap();
    assert!(matches!(outcome, FireOutcome::Fired(_)));

    for _ in 0..10 {
        sim.tick(0.1);
    }

    let shooter_entity = sim.get_by_id(shooter).unwrap();
    let health = sim.world().get::<StatBlock>(shooter_entity).unwrap().health();
    assert_eq!(health, 100.0);
}

#[test]
fn projectile_spawned_mid_frame_waits_one_frame() {
    let mut sim = sim();
    for _ in 0..3 {
        sim.tick(0.1);
    }

    // Hand-built projectile claiming to be born on a future frame.
    let projectile = Projectile::new(
        Vec2::X,
        10.0,
        100.0,
        400.0,
        EntityId::from_raw(999),
        None,
        5,
    )
    .unwrap();
    let entity = sim
        .world_mut()
        .spawn((
            MapPosition::at(Vec2::ZERO),
            Shape::circle(1.0),
            Active(true),
            projectile,
            Bullet::default(),
        ))
        .id();
    let id = sim.add_existing(entity);

    // Frames 4 and 5 leave it untouched; frame 6 is the first advance.
    sim.tick(0.1);
    sim.tick(0.1);
    assert_eq!(sim.position_of(id).unwrap(), Vec2::ZERO);

    sim.tick(0.1);
    let pos = sim.position_of(id).unwrap();
    assert!((pos.x - 10.0).abs() < 1e-3);
}
