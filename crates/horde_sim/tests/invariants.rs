use horde_core::ecs::World;
use horde_core::math::{Aabb, Vec3};
use horde_core::time::TICK_SECONDS;
use horde_sim::components::Health;
use horde_sim::systems::spatial_query;
use horde_sim::{archetypes, EntityKind, GameConfig, Simulation, TickInput};
use proptest::prelude::*;
use std::io::Write;

proptest! {
    #[test]
    fn health_stays_clamped(
        max in 0.0f32..1_000.0,
        deltas in prop::collection::vec(-2_000.0f32..2_000.0, 0..32),
    ) {
        let mut health = Health::full(max);
        for delta in deltas {
            health.apply(delta);
            prop_assert!(health.current >= 0.0);
            prop_assert!(health.current <= health.max);
        }
    }

    #[test]
    fn containment_is_inclusive_at_the_faces(
        cx in -50.0f32..50.0,
        cy in -50.0f32..50.0,
        scale in 0.1f32..4.0,
    ) {
        let aabb = Aabb::from_position_scale(Vec3::new(cx, cy, 0.0), scale);
        prop_assert!(aabb.contains_point(aabb.max()));
        prop_assert!(aabb.contains_point(aabb.min()));
        let outside = aabb.max() + Vec3::splat(1e-3 * (1.0 + cx.abs().max(cy.abs())));
        prop_assert!(!aabb.contains_point(outside));
    }

    #[test]
    fn pool_size_never_changes(shots in prop::collection::vec(0u8..4, 1..80)) {
        let mut sim = Simulation::new(GameConfig {
            num_enemies: 0,
            bullet_pool_size: 5,
            ..GameConfig::default()
        })
        .unwrap();
        sim.start().unwrap();
        for burst in shots {
            for _ in 0..burst {
                sim.fire(Vec3::X).unwrap();
            }
            sim.tick(TICK_SECONDS * 10.0, TickInput::idle()).unwrap();
            prop_assert_eq!(sim.count(EntityKind::Bullet), 5);
            let pool = sim.pool().unwrap();
            prop_assert_eq!(pool.idle_count() + pool.active_count(), 5);
        }
    }
}

#[test]
fn point_on_the_player_face_is_found_and_just_outside_is_not() {
    let config = GameConfig::default();
    let mut world = World::new();
    let player = world
        .spawn(archetypes::player(&config, Vec3::ZERO))
        .unwrap();
    let filter = EntityKind::Player.query();

    assert_eq!(
        spatial_query::entities_at_point(&world, Vec3::splat(0.5), &filter),
        vec![player]
    );
    assert!(spatial_query::entities_at_point(&world, Vec3::new(0.5001, 0.0, 0.0), &filter).is_empty());
}

#[test]
fn config_loads_from_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "numEnemies": 5, "enemySpawnInterval": 2.5, "bulletPoolSize": 8, "seed": 99 }}"#
    )
    .unwrap();

    let config = GameConfig::load(file.path()).unwrap();
    assert_eq!(config.num_enemies, 5);
    assert_eq!(config.enemy_spawn_interval, 2.5);
    assert_eq!(config.seed, 99);

    let mut sim = Simulation::new(config).unwrap();
    sim.start().unwrap();
    sim.tick(TICK_SECONDS, TickInput::idle()).unwrap();
    assert_eq!(sim.count(EntityKind::Enemy), 5);
    assert_eq!(sim.count(EntityKind::Bullet), 8);
}

#[test]
fn missing_config_file_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = GameConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn same_seed_replays_the_same_session() {
    let positions = |seed| {
        let mut sim = Simulation::new(GameConfig {
            num_enemies: 3,
            seed,
            ..GameConfig::default()
        })
        .unwrap();
        sim.start().unwrap();
        for _ in 0..30 {
            sim.tick(TICK_SECONDS, TickInput::idle()).unwrap();
        }
        sim.render_snapshot()
            .into_iter()
            .map(|i| i.position)
            .collect::<Vec<_>>()
    };
    assert_eq!(positions(7), positions(7));
}
