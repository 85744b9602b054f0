//! Continuous regeneration and degeneration.

use crate::components::{Health, HealthRegen};
use horde_core::columns_mut;
use horde_core::ecs::{Entity, Query, World};
use rayon::prelude::*;

/// Apply `rate * dt` to every entity with [`HealthRegen`], clamped.
///
/// Returns the entities whose health dropped to zero during this pass.
/// Entities already at zero are not reported again.
pub fn run(world: &mut World, dt: f32) -> Vec<Entity> {
    let query = Query::new().with::<Health>().with::<HealthRegen>();
    let mut depleted = Vec::new();

    world.for_each_storage_mut(&query, |storage| {
        let entities = storage.entities().to_vec();
        let Some((health, regen)) = columns_mut!(storage, Health, HealthRegen) else {
            return;
        };

        let rows: Vec<usize> = health
            .par_iter_mut()
            .zip(regen.par_iter())
            .enumerate()
            .filter_map(|(row, (h, r))| {
                let was_alive = h.is_alive();
                h.apply(r.rate * dt);
                (was_alive && !h.is_alive()).then_some(row)
            })
            .collect();
        depleted.extend(rows.into_iter().map(|row| entities[row]));
    });

    depleted
}
