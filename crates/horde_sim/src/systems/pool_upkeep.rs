//! Return stray bullets to the pool.

use crate::components::{PoolSlot, Translation};
use crate::error::SimResult;
use crate::pool::BulletPool;
use horde_core::ecs::{Entity, World};

/// Age every active bullet by `dt` and recycle those that outlived
/// `lifetime` seconds or left the arena (planar distance from the origin
/// beyond `arena_radius`). Returns the recycled bullets.
pub fn run(
    world: &mut World,
    pool: &mut BulletPool,
    lifetime: f32,
    arena_radius: f32,
    dt: f32,
) -> SimResult<Vec<Entity>> {
    let mut expired = Vec::new();
    for &bullet in pool.entities() {
        let slot = world.get_mut::<PoolSlot>(bullet)?;
        if !slot.active {
            continue;
        }
        slot.age += dt;
        let age = slot.age;
        let position = world.get::<Translation>(bullet)?.position;
        if age >= lifetime || position.truncate().length() > arena_radius {
            expired.push(bullet);
        }
    }

    for &bullet in &expired {
        pool.recycle(world, bullet)?;
    }
    if !expired.is_empty() {
        tracing::trace!(count = expired.len(), "stray bullets recycled");
    }
    Ok(expired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use horde_core::math::Vec3;

    fn setup() -> (World, BulletPool) {
        let config = GameConfig {
            bullet_pool_size: 2,
            ..GameConfig::default()
        };
        let mut world = World::new();
        let pool = BulletPool::create(&mut world, &config).unwrap();
        (world, pool)
    }

    #[test]
    fn old_bullets_are_recycled() {
        let (mut world, mut pool) = setup();
        let b = pool.fire(&mut world, Vec3::ZERO, Vec3::X, 1.0).unwrap();
        assert!(run(&mut world, &mut pool, 3.0, 50.0, 2.0).unwrap().is_empty());
        assert_eq!(run(&mut world, &mut pool, 3.0, 50.0, 1.0).unwrap(), vec![b]);
        assert_eq!(pool.idle_count(), 2);
    }

    #[test]
    fn bullets_outside_the_arena_are_recycled() {
        let (mut world, mut pool) = setup();
        let far = pool.fire(&mut world, Vec3::new(60.0, 0.0, 0.0), Vec3::X, 1.0).unwrap();
        let near = pool.fire(&mut world, Vec3::new(10.0, 0.0, 0.0), Vec3::X, 1.0).unwrap();
        assert_eq!(run(&mut world, &mut pool, 3.0, 50.0, 0.1).unwrap(), vec![far]);
        assert!(world.get::<PoolSlot>(near).unwrap().active);
    }

    #[test]
    fn idle_bullets_do_not_age() {
        let (mut world, mut pool) = setup();
        run(&mut world, &mut pool, 3.0, 50.0, 10.0).unwrap();
        for &b in pool.entities() {
            assert_eq!(world.get::<PoolSlot>(b).unwrap().age, 0.0);
        }
    }
}
