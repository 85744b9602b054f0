//! Fixed-size bullet pool.
//!
//! Bullets are spawned once and then cycled between idle (parked at
//! [`IDLE_BULLET_POSITION`], speed 0) and active. The pool never grows or
//! shrinks; `idle` is a free list over the bullet entities.

use crate::archetypes::{self, BULLET_SCALE, IDLE_BULLET_POSITION};
use crate::components::{BoundingVolume, Movement, PoolSlot, Scale, Translation};
use crate::config::{GameConfig, PoolExhaustedPolicy};
use crate::error::{SimError, SimResult};
use horde_core::ecs::{Entity, World};
use horde_core::math::Vec3;

pub struct BulletPool {
    bullets: Vec<Entity>,
    idle: Vec<Entity>,
    next_serial: u64,
    policy: PoolExhaustedPolicy,
}

impl BulletPool {
    /// Spawn `bulletPoolSize` parked bullets.
    pub fn create(world: &mut World, config: &GameConfig) -> SimResult<Self> {
        let mut bullets = Vec::with_capacity(config.bullet_pool_size);
        for _ in 0..config.bullet_pool_size {
            bullets.push(world.spawn(archetypes::bullet(config))?);
        }
        // Pop order hands out the first-created bullet first.
        let idle = bullets.iter().rev().copied().collect();
        tracing::debug!(capacity = bullets.len(), "bullet pool created");
        Ok(Self {
            bullets,
            idle,
            next_serial: 0,
            policy: config.pool_exhausted_policy,
        })
    }

    pub fn capacity(&self) -> usize {
        self.bullets.len()
    }

    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    pub fn active_count(&self) -> usize {
        self.bullets.len() - self.idle.len()
    }

    pub fn policy(&self) -> PoolExhaustedPolicy {
        self.policy
    }

    /// Every pooled bullet, in creation order.
    pub fn entities(&self) -> &[Entity] {
        &self.bullets
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.bullets.contains(&entity)
    }

    /// Launch a bullet from `origin` along `direction`.
    ///
    /// With no idle bullet left the configured policy decides: re-fire the
    /// bullet with the oldest activation, or fail with `PoolExhausted`.
    pub fn fire(
        &mut self,
        world: &mut World,
        origin: Vec3,
        direction: Vec3,
        speed: f32,
    ) -> SimResult<Entity> {
        let entity = match self.idle.pop() {
            Some(entity) => entity,
            None => match self.policy {
                PoolExhaustedPolicy::RecycleOldest => {
                    let oldest = self.oldest_active(world)?;
                    tracing::debug!(bullet = %oldest, "pool exhausted, re-firing oldest bullet");
                    oldest
                }
                PoolExhaustedPolicy::Drop => {
                    tracing::warn!(capacity = self.capacity(), "pool exhausted, fire request dropped");
                    return Err(SimError::PoolExhausted {
                        capacity: self.capacity(),
                    });
                }
            },
        };

        let serial = self.next_serial;
        self.next_serial += 1;
        place(world, entity, origin, BULLET_SCALE)?;
        world.set(
            entity,
            Movement {
                speed,
                direction: direction.normalize_or_zero(),
            },
        )?;
        world.set(
            entity,
            PoolSlot {
                active: true,
                age: 0.0,
                serial,
            },
        )?;
        tracing::trace!(bullet = %entity, serial, "bullet fired");
        Ok(entity)
    }

    /// Park an active bullet. Returns `false` if it was already idle.
    pub fn recycle(&mut self, world: &mut World, entity: Entity) -> SimResult<bool> {
        let slot = world.get::<PoolSlot>(entity)?;
        if !slot.active {
            return Ok(false);
        }
        place(world, entity, IDLE_BULLET_POSITION, BULLET_SCALE)?;
        world.set(entity, Movement::default())?;
        world.set(
            entity,
            PoolSlot {
                active: false,
                age: 0.0,
                serial: slot.serial,
            },
        )?;
        self.idle.push(entity);
        tracing::trace!(bullet = %entity, "bullet recycled");
        Ok(true)
    }

    /// Park every active bullet. Returns how many were recycled.
    pub fn park_all(&mut self, world: &mut World) -> SimResult<usize> {
        let mut parked = 0;
        for i in 0..self.bullets.len() {
            if self.recycle(world, self.bullets[i])? {
                parked += 1;
            }
        }
        Ok(parked)
    }

    fn oldest_active(&self, world: &World) -> SimResult<Entity> {
        let mut oldest: Option<(u64, Entity)> = None;
        for &entity in &self.bullets {
            let slot = world.get::<PoolSlot>(entity)?;
            if slot.active && oldest.is_none_or(|(serial, _)| slot.serial < serial) {
                oldest = Some((slot.serial, entity));
            }
        }
        oldest.map(|(_, entity)| entity).ok_or(SimError::PoolExhausted {
            capacity: self.capacity(),
        })
    }
}

fn place(world: &mut World, entity: Entity, position: Vec3, scale: f32) -> SimResult<()> {
    let translation = Translation { position };
    let scale = Scale { value: scale };
    world.set(entity, translation)?;
    world.set(entity, scale)?;
    world.set(entity, BoundingVolume::from_translation_scale(&translation, &scale))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(size: usize, policy: PoolExhaustedPolicy) -> (World, BulletPool) {
        let config = GameConfig {
            bullet_pool_size: size,
            pool_exhausted_policy: policy,
            ..GameConfig::default()
        };
        let mut world = World::new();
        let pool = BulletPool::create(&mut world, &config).unwrap();
        (world, pool)
    }

    #[test]
    fn fire_and_recycle_keep_capacity() {
        let (mut world, mut pool) = setup(3, PoolExhaustedPolicy::Drop);
        let first = pool.fire(&mut world, Vec3::ZERO, Vec3::X, 10.0).unwrap();
        assert_eq!(first, pool.entities()[0]);
        assert_eq!(pool.active_count(), 1);
        assert_eq!(world.get::<Movement>(first).unwrap().speed, 10.0);

        assert!(pool.recycle(&mut world, first).unwrap());
        assert!(!pool.recycle(&mut world, first).unwrap());
        assert_eq!(pool.idle_count(), 3);
        assert_eq!(world.get::<Translation>(first).unwrap().position, IDLE_BULLET_POSITION);
        assert_eq!(world.len(), 3);
    }

    #[test]
    fn drop_policy_rejects_when_exhausted() {
        let (mut world, mut pool) = setup(2, PoolExhaustedPolicy::Drop);
        pool.fire(&mut world, Vec3::ZERO, Vec3::X, 1.0).unwrap();
        pool.fire(&mut world, Vec3::ZERO, Vec3::Y, 1.0).unwrap();
        assert!(matches!(
            pool.fire(&mut world, Vec3::ZERO, Vec3::X, 1.0),
            Err(SimError::PoolExhausted { capacity: 2 })
        ));
    }

    #[test]
    fn recycle_oldest_reuses_first_fired() {
        let (mut world, mut pool) = setup(2, PoolExhaustedPolicy::RecycleOldest);
        let a = pool.fire(&mut world, Vec3::ZERO, Vec3::X, 1.0).unwrap();
        let b = pool.fire(&mut world, Vec3::ZERO, Vec3::Y, 1.0).unwrap();
        let c = pool.fire(&mut world, Vec3::ONE, Vec3::NEG_X, 1.0).unwrap();
        assert_eq!(c, a);
        let d = pool.fire(&mut world, Vec3::ONE, Vec3::NEG_X, 1.0).unwrap();
        assert_eq!(d, b);
        assert_eq!(world.get::<Translation>(a).unwrap().position, Vec3::ONE);
        assert_eq!(pool.capacity(), 2);
    }

    #[test]
    fn park_all_returns_everything() {
        let (mut world, mut pool) = setup(4, PoolExhaustedPolicy::Drop);
        for _ in 0..3 {
            pool.fire(&mut world, Vec3::ZERO, Vec3::X, 1.0).unwrap();
        }
        assert_eq!(pool.park_all(&mut world).unwrap(), 3);
        assert_eq!(pool.active_count(), 0);
    }
}
