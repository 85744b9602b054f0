//! Integrate positions and keep bounds in sync.

use crate::components::{BoundingVolume, Movement, Scale, Translation};
use horde_core::columns_mut;
use horde_core::ecs::{Query, World};
use rayon::prelude::*;

/// `position += direction * speed * dt` for every moving entity, then
/// rebuild its bounding volume. Parked entities (speed 0) are untouched.
/// Returns how many entities moved.
pub fn run(world: &mut World, dt: f32) -> usize {
    let query = Query::new()
        .with::<Movement>()
        .with::<Translation>()
        .with::<Scale>()
        .with::<BoundingVolume>();
    let mut moved = 0;

    world.for_each_storage_mut(&query, |storage| {
        let Some((translation, movement, scale, bounds)) =
            columns_mut!(storage, Translation, Movement, Scale, BoundingVolume)
        else {
            return;
        };

        moved += translation
            .par_iter_mut()
            .zip(movement.par_iter())
            .zip(scale.par_iter())
            .zip(bounds.par_iter_mut())
            .filter(|(((_, m), _), _)| m.speed > 0.0)
            .map(|(((t, m), s), b)| {
                t.position += m.direction * m.speed * dt;
                *b = BoundingVolume::from_translation_scale(t, s);
            })
            .count();
    });

    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetypes;
    use crate::config::GameConfig;
    use approx::assert_relative_eq;
    use horde_core::math::Vec3;

    #[test]
    fn moving_entities_advance_and_parked_stay() {
        let config = GameConfig::default();
        let mut world = World::new();
        let e = world.spawn(archetypes::enemy(&config, Vec3::ZERO)).unwrap();
        let idle = world.spawn(archetypes::bullet(&config)).unwrap();
        world
            .set(e, Movement { speed: 2.0, direction: Vec3::X })
            .unwrap();

        assert_eq!(run(&mut world, 0.5), 1);

        let t = world.get::<Translation>(e).unwrap();
        assert_relative_eq!(t.position.x, 1.0);
        let bv = world.get::<BoundingVolume>(e).unwrap();
        assert_eq!(bv.aabb.center, t.position);
        assert_relative_eq!(bv.aabb.extents.x, 0.25);
        assert_eq!(
            world.get::<Translation>(idle).unwrap().position,
            archetypes::IDLE_BULLET_POSITION
        );
    }
}
