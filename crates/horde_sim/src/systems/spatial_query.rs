//! Point containment queries against bounding volumes.
//!
//! Matching is done against every box independently, so a point inside two
//! overlapping boxes mutates both.

use crate::components::{BoundingVolume, Scale, Translation};
use horde_core::ecs::{Entity, Query, World, WorldError};
use horde_core::math::Vec3;

/// Every entity matching `filter` whose bounds contain `point` (faces inclusive).
pub fn entities_at_point(world: &World, point: Vec3, filter: &Query) -> Vec<Entity> {
    let query = filter.clone().with::<BoundingVolume>();
    let mut hits = Vec::new();
    for storage in world.storages_matching(&query) {
        let Some(bounds) = storage.column::<BoundingVolume>() else {
            continue;
        };
        hits.extend(
            storage
                .entities()
                .iter()
                .zip(bounds)
                .filter(|(_, bv)| bv.aabb.contains_point(point))
                .map(|(entity, _)| *entity),
        );
    }
    hits
}

/// Run `mutate` on every match. Returns the number of entities mutated.
pub fn apply_at_point<F>(world: &mut World, point: Vec3, filter: &Query, mut mutate: F) -> Result<usize, WorldError>
where
    F: FnMut(&mut World, Entity) -> Result<(), WorldError>,
{
    let hits = entities_at_point(world, point, filter);
    for &entity in &hits {
        mutate(world, entity)?;
    }
    Ok(hits.len())
}

/// Tap interaction: `scale += step`, extents follow as `scale * 0.5`.
pub fn grow(world: &mut World, entity: Entity, step: f32) -> Result<(), WorldError> {
    let translation = world.get::<Translation>(entity)?;
    let scale = {
        let scale = world.get_mut::<Scale>(entity)?;
        scale.value += step;
        *scale
    };
    world.set(entity, BoundingVolume::from_translation_scale(&translation, &scale))
}

/// Apply queued taps at the world-space points the host supplied. Returns total matches.
pub fn run(world: &mut World, taps: &[Vec3], step: f32) -> Result<usize, WorldError> {
    let filter = Query::new().with::<Scale>().with::<Translation>();
    let mut grown = 0;
    for tap in taps {
        grown += apply_at_point(world, *tap, &filter, |world, entity| grow(world, entity, step))?;
    }
    if grown > 0 {
        tracing::debug!(taps = taps.len(), grown, "taps applied");
    }
    Ok(grown)
}
