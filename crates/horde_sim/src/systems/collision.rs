//! Contact damage and healing.
//!
//! A source is anything with a [`HealthModifier`]; a target is anything with
//! [`Health`]. Eligible pairs are bullet→enemy, enemy→player and food→player;
//! idle bullets never take part. All deltas landing on one target are summed
//! and applied once, and the defeat/destroy check runs on the clamped result.
//! Structural changes go through the command buffer and are applied after the
//! pass.

use crate::components::{BoundingVolume, Bullet, Enemy, Food, Health, HealthModifier, Player, PoolSlot};
use crate::error::SimResult;
use crate::events::GameEvent;
use crate::pool::BulletPool;
use horde_core::ecs::{CommandBuffer, Component, Entity, Query, SpatialHashGrid, World};
use horde_core::math::Aabb;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SourceRole {
    Bullet,
    Enemy,
    Food,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TargetRole {
    Player,
    Enemy,
}

impl SourceRole {
    fn hits(self, target: TargetRole) -> bool {
        matches!(
            (self, target),
            (SourceRole::Bullet, TargetRole::Enemy)
                | (SourceRole::Enemy, TargetRole::Player)
                | (SourceRole::Food, TargetRole::Player)
        )
    }
}

struct Source {
    entity: Entity,
    role: SourceRole,
    aabb: Aabb,
    amount: f32,
}

struct Target {
    role: TargetRole,
    aabb: Aabb,
}

/// What a collision pass did.
#[derive(Debug, Default)]
pub struct CollisionOutcome {
    pub events: Vec<GameEvent>,
    /// The player's health reached zero in this pass.
    pub player_depleted: bool,
    /// Number of source/target contacts applied.
    pub contacts: usize,
}

/// Resolve every overlapping source/target pair.
pub fn run(
    world: &mut World,
    pool: &mut BulletPool,
    grid: &mut SpatialHashGrid,
    commands: &mut CommandBuffer,
) -> SimResult<CollisionOutcome> {
    let sources = gather_sources(world);
    let targets = gather_targets(world, grid);
    let mut outcome = CollisionOutcome::default();

    // Keyed by entity so deltas apply in a stable order.
    let mut deltas: BTreeMap<Entity, f32> = BTreeMap::new();
    let mut spent: Vec<&Source> = Vec::new();
    let mut candidates = Vec::new();

    for source in &sources {
        grid.query_aabb(&source.aabb, &mut candidates);
        let mut touched = false;
        for &entity in &candidates {
            let Some(target) = targets.get(&entity) else { continue };
            if entity == source.entity || !source.role.hits(target.role) {
                continue;
            }
            if source.aabb.intersects(&target.aabb) {
                *deltas.entry(entity).or_insert(0.0) += source.amount;
                outcome.contacts += 1;
                touched = true;
            }
        }
        if touched {
            spent.push(source);
        }
    }

    let mut destroyed: Vec<Entity> = Vec::new();
    for (&entity, &delta) in &deltas {
        let health = world.get_mut::<Health>(entity)?;
        let was_alive = health.is_alive();
        health.apply(delta);
        if !was_alive || health.is_alive() {
            continue;
        }
        match targets.get(&entity).map(|t| t.role) {
            Some(TargetRole::Player) => outcome.player_depleted = true,
            Some(TargetRole::Enemy) => {
                let points = world.get::<Enemy>(entity)?.points;
                commands.despawn(entity);
                destroyed.push(entity);
                outcome.events.push(GameEvent::EnemyDestroyed { entity, points });
            }
            None => {}
        }
    }

    for source in spent {
        match source.role {
            SourceRole::Bullet => {
                if pool.recycle(world, source.entity)? {
                    outcome.events.push(GameEvent::BulletRecycled {
                        entity: source.entity,
                    });
                }
            }
            SourceRole::Food => {
                commands.despawn(source.entity);
                outcome.events.push(GameEvent::FoodConsumed {
                    entity: source.entity,
                    heal: source.amount,
                });
            }
            SourceRole::Enemy => {
                if !destroyed.contains(&source.entity) {
                    commands.despawn(source.entity);
                    outcome.events.push(GameEvent::EnemyConsumed {
                        entity: source.entity,
                    });
                }
            }
        }
    }

    world.apply_commands(commands)?;
    if outcome.contacts > 0 {
        tracing::trace!(contacts = outcome.contacts, events = outcome.events.len(), "collisions resolved");
    }
    Ok(outcome)
}

fn gather_sources(world: &World) -> Vec<Source> {
    let query = Query::new().with::<HealthModifier>().with::<BoundingVolume>();
    let mut sources = Vec::new();
    for storage in world.storages_matching(&query) {
        let role = if storage.has_component(Bullet::ID) {
            SourceRole::Bullet
        } else if storage.has_component(Enemy::ID) {
            SourceRole::Enemy
        } else if storage.has_component(Food::ID) {
            SourceRole::Food
        } else {
            continue;
        };
        let (Some(modifiers), Some(bounds)) = (
            storage.column::<HealthModifier>(),
            storage.column::<BoundingVolume>(),
        ) else {
            continue;
        };
        let slots = storage.column::<PoolSlot>();

        for (row, &entity) in storage.entities().iter().enumerate() {
            if slots.is_some_and(|slots| !slots[row].active) {
                continue;
            }
            sources.push(Source {
                entity,
                role,
                aabb: bounds[row].aabb,
                amount: modifiers[row].amount,
            });
        }
    }
    sources
}

fn gather_targets(world: &World, grid: &mut SpatialHashGrid) -> BTreeMap<Entity, Target> {
    let query = Query::new().with::<Health>().with::<BoundingVolume>();
    let mut targets = BTreeMap::new();
    grid.clear();
    for storage in world.storages_matching(&query) {
        let role = if storage.has_component(Player::ID) {
            TargetRole::Player
        } else if storage.has_component(Enemy::ID) {
            TargetRole::Enemy
        } else {
            continue;
        };
        let Some(bounds) = storage.column::<BoundingVolume>() else {
            continue;
        };
        for (&entity, bv) in storage.entities().iter().zip(bounds) {
            grid.insert(entity, &bv.aabb);
            targets.insert(entity, Target { role, aabb: bv.aabb });
        }
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetypes;
    use crate::components::{Movement, Translation};
    use crate::config::GameConfig;
    use horde_core::math::Vec3;

    struct Arena {
        world: World,
        pool: BulletPool,
        grid: SpatialHashGrid,
        commands: CommandBuffer,
        config: GameConfig,
    }

    impl Arena {
        fn new(config: GameConfig) -> Self {
            let mut world = World::new();
            let pool = BulletPool::create(&mut world, &config).unwrap();
            Self {
                world,
                pool,
                grid: SpatialHashGrid::default(),
                commands: CommandBuffer::new(),
                config,
            }
        }

        fn step(&mut self) -> CollisionOutcome {
            run(&mut self.world, &mut self.pool, &mut self.grid, &mut self.commands).unwrap()
        }
    }

    #[test]
    fn bullet_kills_enemy_and_returns_to_pool() {
        let mut arena = Arena::new(GameConfig {
            bullet_damage: 15.0,
            ..GameConfig::default()
        });
        let enemy = arena
            .world
            .spawn(archetypes::enemy(&arena.config, Vec3::new(5.0, 0.0, 0.0)))
            .unwrap();
        let bullet = arena
            .pool
            .fire(&mut arena.world, Vec3::new(5.0, 0.1, 0.0), Vec3::X, 10.0)
            .unwrap();

        let outcome = arena.step();
        assert!(!arena.world.is_alive(enemy));
        assert_eq!(
            outcome.events,
            vec![
                GameEvent::EnemyDestroyed { entity: enemy, points: 10 },
                GameEvent::BulletRecycled { entity: bullet },
            ]
        );
        assert_eq!(arena.world.get::<Movement>(bullet).unwrap().speed, 0.0);
        assert_eq!(arena.pool.idle_count(), arena.pool.capacity());
    }

    #[test]
    fn idle_bullets_never_collide() {
        let mut arena = Arena::new(GameConfig::default());
        let enemy = arena
            .world
            .spawn(archetypes::enemy(&arena.config, archetypes::IDLE_BULLET_POSITION))
            .unwrap();
        let outcome = arena.step();
        assert_eq!(outcome.contacts, 0);
        assert_eq!(arena.world.get::<Health>(enemy).unwrap().current, 10.0);
    }

    #[test]
    fn deltas_on_one_target_are_summed_then_clamped() {
        let mut arena = Arena::new(GameConfig::default());
        let player = arena.world.spawn(archetypes::player(&arena.config, Vec3::ZERO)).unwrap();
        arena.world.get_mut::<Health>(player).unwrap().current = 15.0;
        let e1 = arena.world.spawn(archetypes::enemy(&arena.config, Vec3::new(0.3, 0.0, 0.0))).unwrap();
        let e2 = arena.world.spawn(archetypes::enemy(&arena.config, Vec3::new(-0.3, 0.0, 0.0))).unwrap();
        let food = arena.world.spawn(archetypes::food(&arena.config, Vec3::new(0.0, 0.3, 0.0))).unwrap();

        let outcome = arena.step();
        // One summed delta: clamping each contact in turn would have given 50.
        assert_eq!(arena.world.get::<Health>(player).unwrap().current, 45.0);
        assert!(!outcome.player_depleted);
        assert!(!arena.world.is_alive(e1) && !arena.world.is_alive(e2) && !arena.world.is_alive(food));
        assert!(outcome.events.contains(&GameEvent::EnemyConsumed { entity: e1 }));
        assert!(outcome.events.contains(&GameEvent::FoodConsumed { entity: food, heal: 50.0 }));
    }

    #[test]
    fn lethal_contact_depletes_player() {
        let mut arena = Arena::new(GameConfig::default());
        let player = arena.world.spawn(archetypes::player(&arena.config, Vec3::ZERO)).unwrap();
        arena.world.get_mut::<Health>(player).unwrap().current = 5.0;
        arena.world.spawn(archetypes::enemy(&arena.config, Vec3::new(0.5, 0.0, 0.0))).unwrap();

        let outcome = arena.step();
        assert!(outcome.player_depleted);
        assert_eq!(arena.world.get::<Health>(player).unwrap().current, 0.0);
    }

    #[test]
    fn enemies_do_not_hurt_each_other() {
        let mut arena = Arena::new(GameConfig::default());
        let a = arena.world.spawn(archetypes::enemy(&arena.config, Vec3::ZERO)).unwrap();
        let b = arena.world.spawn(archetypes::enemy(&arena.config, Vec3::new(0.1, 0.0, 0.0))).unwrap();
        let outcome = arena.step();
        assert_eq!(outcome.contacts, 0);
        assert!(arena.world.is_alive(a) && arena.world.is_alive(b));
        assert_eq!(arena.world.get::<Translation>(b).unwrap().position.x, 0.1);
    }
}
