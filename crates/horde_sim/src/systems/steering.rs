//! Enemy steering: seek the player, keep apart from neighbours.
//!
//! Only directions are written here; the movement pass integrates them.

use crate::components::{Enemy, Movement, Translation};
use horde_core::columns_mut;
use horde_core::ecs::{Entity, Query, SpatialHashGrid, World};
use horde_core::math::{planar_direction, Aabb, Vec3};
use rayon::prelude::*;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SteeringParams {
    /// Neighbours closer than this push each other apart.
    pub separation_radius: f32,
    /// Weight of the push relative to the unit seek vector.
    pub separation_force: f32,
}

/// Point every enemy at `player`, bent away from crowding neighbours.
/// Returns the number of enemies steered.
pub fn run(world: &mut World, grid: &mut SpatialHashGrid, player: Vec3, params: SteeringParams) -> usize {
    let query = Query::new().with::<Enemy>().with::<Translation>().with::<Movement>();
    let mut steered = 0;

    world.for_each_storage_mut(&query, |storage| {
        let entities = storage.entities().to_vec();
        let Some((translation, movement)) = columns_mut!(storage, Translation, Movement) else {
            return;
        };

        grid.clear();
        let separating = params.separation_radius > 0.0 && params.separation_force > 0.0;
        if separating {
            for (entity, t) in entities.iter().zip(translation.iter()) {
                grid.insert(*entity, &Aabb::new(t.position, Vec3::ZERO));
            }
        }
        let rows: HashMap<Entity, usize> = entities.iter().enumerate().map(|(i, e)| (*e, i)).collect();

        let positions: &[Translation] = translation;
        let grid: &SpatialHashGrid = grid;
        let directions: Vec<Vec3> = positions
            .par_iter()
            .enumerate()
            .map_init(Vec::new, |neighbours, (i, t)| {
                let seek = planar_direction(t.position, player);
                if !separating {
                    return seek;
                }
                let push = separation(i, positions, grid, &rows, neighbours, params.separation_radius);
                (seek + push * params.separation_force).normalize_or_zero()
            })
            .collect();

        for (m, direction) in movement.iter_mut().zip(directions) {
            m.direction = direction;
        }
        steered += entities.len();
    });

    steered
}

/// Sum of pushes away from every neighbour inside `radius`, each scaled
/// linearly from 1 at contact to 0 at the radius.
fn separation(
    i: usize,
    positions: &[Translation],
    grid: &SpatialHashGrid,
    rows: &HashMap<Entity, usize>,
    neighbours: &mut Vec<Entity>,
    radius: f32,
) -> Vec3 {
    let p = positions[i].position;
    grid.query_aabb(&Aabb::new(p, Vec3::splat(radius)), neighbours);

    let mut push = Vec3::ZERO;
    for entity in neighbours.iter() {
        let Some(&j) = rows.get(entity) else { continue };
        if j == i {
            continue;
        }
        let mut delta = p - positions[j].position;
        delta.z = 0.0;
        let dist = delta.length();
        if dist > 1e-6 && dist < radius {
            push += delta / dist * (1.0 - dist / radius);
        }
    }
    push
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetypes;
    use crate::config::GameConfig;

    const PARAMS: SteeringParams = SteeringParams {
        separation_radius: 1.0,
        separation_force: 2.0,
    };

    #[test]
    fn lone_enemy_seeks_player() {
        let config = GameConfig::default();
        let mut world = World::new();
        let e = world.spawn(archetypes::enemy(&config, Vec3::new(10.0, 0.0, 0.0))).unwrap();
        let mut grid = SpatialHashGrid::default();

        assert_eq!(run(&mut world, &mut grid, Vec3::ZERO, PARAMS), 1);
        assert_eq!(world.get::<Movement>(e).unwrap().direction, Vec3::NEG_X);
    }

    #[test]
    fn crowded_enemies_veer_apart() {
        let config = GameConfig::default();
        let mut world = World::new();
        let a = world.spawn(archetypes::enemy(&config, Vec3::new(10.0, 0.2, 0.0))).unwrap();
        let b = world.spawn(archetypes::enemy(&config, Vec3::new(10.0, -0.2, 0.0))).unwrap();
        let mut grid = SpatialHashGrid::default();
        run(&mut world, &mut grid, Vec3::ZERO, PARAMS);

        let da = world.get::<Movement>(a).unwrap().direction;
        let db = world.get::<Movement>(b).unwrap().direction;
        assert!(da.x < 0.0 && db.x < 0.0);
        assert!(da.y > 0.0, "upper enemy pushed up: {da:?}");
        assert!(db.y < 0.0, "lower enemy pushed down: {db:?}");
        assert!((da.length() - 1.0).abs() < 1e-5);
    }
}
