use horde_core::ecs::{Entity, WorldError};
use horde_core::math::{planar_direction, Vec3};
use horde_core::time::TICK_SECONDS;
use horde_sim::components::{Health, PoolSlot, Translation};
use horde_sim::{EntityKind, GameConfig, GameEvent, PoolExhaustedPolicy, SimError, Simulation, TickInput};

fn running(config: GameConfig) -> Simulation {
    let mut sim = Simulation::new(config).unwrap();
    sim.start().unwrap();
    sim
}

/// Fire at `target` until it dies. Returns the events seen on the way.
fn shoot_down(sim: &mut Simulation, target: Entity) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..10 {
        if !sim.world().is_alive(target) {
            break;
        }
        let aim = sim.world().get::<Translation>(target).unwrap().position;
        sim.fire(planar_direction(Vec3::ZERO, aim)).unwrap();
        for _ in 0..(3 * 60) {
            let report = sim.tick(TICK_SECONDS, TickInput::idle()).unwrap();
            let hit = report
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::BulletRecycled { .. }));
            events.extend(report.events);
            if hit {
                break;
            }
        }
    }
    events
}

#[test]
fn three_enemies_fall_to_one_bullet_each() {
    let mut sim = running(GameConfig {
        num_enemies: 0,
        bullet_damage: 10.0,
        separation_force: 0.0,
        ..GameConfig::default()
    });
    let enemies = sim.spawn_enemies(3).unwrap();

    let mut destroyed = Vec::new();
    for &enemy in &enemies {
        for event in shoot_down(&mut sim, enemy) {
            if let GameEvent::EnemyDestroyed { entity, points } = event {
                destroyed.push((entity, points));
            }
        }
    }

    destroyed.sort();
    let mut expected: Vec<_> = enemies.iter().map(|&e| (e, 10)).collect();
    expected.sort();
    assert_eq!(destroyed, expected);
    assert_eq!(sim.count(EntityKind::Enemy), 0);
    assert_eq!(sim.score().score, 30);
    assert_eq!(sim.score().kills, 3);
    assert_eq!(sim.hud().unwrap().score, 30);
}

#[test]
fn overkill_still_destroys_and_clamps_at_zero() {
    let mut sim = running(GameConfig {
        num_enemies: 0,
        bullet_damage: 15.0,
        ..GameConfig::default()
    });
    let enemy = sim.spawn_enemies(1).unwrap()[0];
    assert_eq!(sim.world().get::<Health>(enemy).unwrap(), Health { current: 10.0, max: 10.0 });

    let events = shoot_down(&mut sim, enemy);
    assert!(events.contains(&GameEvent::EnemyDestroyed { entity: enemy, points: 10 }));

    // The handle is stale once the enemy is gone.
    assert!(matches!(
        sim.world().get::<Health>(enemy),
        Err(WorldError::InvalidHandle { .. })
    ));
}

#[test]
fn enemies_reaching_the_player_are_consumed_without_score() {
    let mut sim = running(GameConfig {
        num_enemies: 1,
        enemy_speed: 10.0,
        enemy_min_radius: 3.0,
        enemy_max_radius: 3.0,
        ..GameConfig::default()
    });

    let mut consumed = 0;
    for _ in 0..120 {
        let report = sim.tick(TICK_SECONDS, TickInput::idle()).unwrap();
        consumed += report
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyConsumed { .. }))
            .count();
    }
    assert_eq!(consumed, 1);
    assert_eq!(sim.count(EntityKind::Enemy), 0);
    assert_eq!(sim.score().score, 0);
    let hud = sim.hud().unwrap();
    assert!(hud.current < 40.0 && hud.current > 37.0, "health {}", hud.current);
}

#[test]
fn recycle_oldest_refires_the_first_bullet() {
    let mut sim = running(GameConfig {
        num_enemies: 0,
        ..GameConfig::default()
    });
    let fired: Vec<Entity> = (0..25).map(|_| sim.fire(Vec3::X).unwrap()).collect();
    assert_eq!(sim.pool().unwrap().idle_count(), 0);

    let refired = sim.fire(Vec3::Y).unwrap();
    assert_eq!(refired, fired[0]);
    let slot = sim.world().get::<PoolSlot>(refired).unwrap();
    assert!(slot.active);
    assert_eq!(slot.serial, 25);
    assert_eq!(sim.count(EntityKind::Bullet), 25);
}

#[test]
fn drop_policy_rejects_the_twenty_sixth_shot() {
    let mut sim = running(GameConfig {
        num_enemies: 0,
        pool_exhausted_policy: PoolExhaustedPolicy::Drop,
        ..GameConfig::default()
    });
    for _ in 0..25 {
        sim.fire(Vec3::X).unwrap();
    }
    assert!(matches!(
        sim.fire(Vec3::X),
        Err(SimError::PoolExhausted { capacity: 25 })
    ));

    // Through tick input the rejection is absorbed.
    sim.tick(TICK_SECONDS, TickInput::firing(Vec3::X)).unwrap();
    assert_eq!(sim.count(EntityKind::Bullet), 25);
}

#[test]
fn bullets_return_to_the_pool_after_their_lifetime() {
    let mut sim = running(GameConfig {
        num_enemies: 0,
        bullet_speed: 1.0,
        bullet_lifetime: 1.0,
        ..GameConfig::default()
    });
    let bullet = sim.fire(Vec3::X).unwrap();
    let mut recycled_at = None;
    for _ in 0..90 {
        let report = sim.tick(TICK_SECONDS, TickInput::idle()).unwrap();
        if report.events.contains(&GameEvent::BulletRecycled { entity: bullet }) {
            recycled_at = Some(report.tick);
            break;
        }
    }
    let tick = recycled_at.expect("bullet recycled");
    assert!((59..=61).contains(&tick), "recycled at tick {tick}");
    let pool = sim.pool().unwrap();
    assert_eq!(pool.idle_count(), pool.capacity());
}
