//! Enemy waves and food drops.
//!
//! Placement uses a seeded xoshiro generator so a session replays
//! identically for a given `seed`.

use crate::archetypes;
use crate::config::GameConfig;
use crate::error::SimResult;
use horde_core::ecs::{Entity, World};
use horde_core::math::Vec3;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::f32::consts::TAU;

/// Periodic triggers armed while a session runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpawnTrigger {
    EnemyWave,
    Food,
}

/// Enemy waves are centered on the arena origin.
pub const ARENA_CENTER: Vec3 = Vec3::ZERO;

pub struct Spawner {
    rng: Xoshiro256PlusPlus,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Uniform sample over the ring `min_radius ..= max_radius` around `center`
    /// on the xy plane. Area-uniform, so the outer edge is not under-sampled.
    pub fn annulus_point(&mut self, center: Vec3, min_radius: f32, max_radius: f32) -> Vec3 {
        let u: f32 = self.rng.gen();
        let v: f32 = self.rng.gen();
        let (r0, r1) = (min_radius * min_radius, max_radius * max_radius);
        let r = (u * (r1 - r0) + r0).sqrt();
        let theta = TAU * v;
        center + Vec3::new(r * theta.cos(), r * theta.sin(), 0.0)
    }

    /// Spawn `count` enemies on the configured ring around the arena center.
    pub fn spawn_wave(&mut self, world: &mut World, config: &GameConfig, count: usize) -> SimResult<Vec<Entity>> {
        let mut spawned = Vec::with_capacity(count);
        for _ in 0..count {
            let position = self.annulus_point(ARENA_CENTER, config.enemy_min_radius, config.enemy_max_radius);
            spawned.push(world.spawn(archetypes::enemy(config, position))?);
        }
        tracing::debug!(count, "enemy wave spawned");
        Ok(spawned)
    }

    /// Drop one food item on the configured ring around `near`.
    pub fn spawn_food_near(&mut self, world: &mut World, config: &GameConfig, near: Vec3) -> SimResult<(Entity, Vec3)> {
        let position = self.annulus_point(near, config.food_min_radius, config.food_max_radius);
        let entity = world.spawn(archetypes::food(config, position))?;
        tracing::debug!(food = %entity, x = position.x, y = position.y, "food spawned");
        Ok((entity, position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Enemy, Translation};
    use horde_core::ecs::Query;

    #[test]
    fn samples_stay_inside_the_ring() {
        let mut spawner = Spawner::new(11);
        let center = Vec3::new(3.0, -2.0, 0.0);
        for _ in 0..1_000 {
            let p = spawner.annulus_point(center, 15.0, 20.0);
            let d = (p - center).length();
            assert!((15.0 - 1e-3..=20.0 + 1e-3).contains(&d), "distance {d}");
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn degenerate_ring_is_a_circle() {
        let mut spawner = Spawner::new(5);
        let p = spawner.annulus_point(Vec3::ZERO, 2.0, 2.0);
        assert!((p.length() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn same_seed_same_wave() {
        let config = GameConfig { num_enemies: 3, ..GameConfig::default() };
        let positions = |seed| {
            let mut world = World::new();
            let mut spawner = Spawner::new(seed);
            spawner.spawn_wave(&mut world, &config, 3).unwrap();
            world
                .query(&Query::new().with::<Enemy>())
                .into_iter()
                .map(|e| world.get::<Translation>(e).unwrap().position)
                .collect::<Vec<_>>()
        };
        assert_eq!(positions(42), positions(42));
        assert_ne!(positions(42), positions(43));
    }
}
