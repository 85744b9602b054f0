//! Spatial hash grid for box-based broad phase queries.
//!
//! Boxes are bucketed on the xy plane into uniform cells. An entry is stored in
//! every cell its box covers, so a query only has to look at the cells its own
//! box covers. Callers still run the exact overlap test on the candidates.

use crate::ecs::Entity;
use crate::math::{Aabb, Vec3};
use std::collections::HashMap;

/// Configuration for spatial hash grid.
#[derive(Debug, Clone)]
pub struct SpatialHashConfig {
    /// Size of each grid cell (in world units).
    pub cell_size: f32,
}

impl SpatialHashConfig {
    pub fn new(cell_size: f32) -> Self {
        Self { cell_size }
    }
}

impl Default for SpatialHashConfig {
    fn default() -> Self {
        Self::new(2.0)
    }
}

/// Grid cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CellCoord {
    x: i32,
    y: i32,
}

impl CellCoord {
    fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Spatial hash grid accelerator.
pub struct SpatialHashGrid {
    config: SpatialHashConfig,
    /// Map from cell coordinates to entities whose boxes touch that cell.
    cells: HashMap<CellCoord, Vec<Entity>>,
    len: usize,
}

impl SpatialHashGrid {
    pub fn new(config: SpatialHashConfig) -> Self {
        let cell_size = if config.cell_size > 0.0 { config.cell_size } else { 1.0 };
        Self {
            config: SpatialHashConfig { cell_size },
            cells: HashMap::new(),
            len: 0,
        }
    }

    /// Number of inserted entities.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Convert a position to a cell coordinate.
    fn pos_to_cell(&self, p: Vec3) -> CellCoord {
        CellCoord::new(
            (p.x / self.config.cell_size).floor() as i32,
            (p.y / self.config.cell_size).floor() as i32,
        )
    }

    fn covered_cells(&self, aabb: &Aabb) -> impl Iterator<Item = CellCoord> {
        let lo = self.pos_to_cell(aabb.min());
        let hi = self.pos_to_cell(aabb.max());
        (lo.x..=hi.x).flat_map(move |x| (lo.y..=hi.y).map(move |y| CellCoord::new(x, y)))
    }

    /// Insert an entity with its box.
    pub fn insert(&mut self, entity: Entity, aabb: &Aabb) {
        let cells: Vec<CellCoord> = self.covered_cells(aabb).collect();
        for cell in cells {
            self.cells.entry(cell).or_default().push(entity);
        }
        self.len += 1;
    }

    /// Collect every entity sharing a cell with `aabb` into `out`.
    ///
    /// `out` is cleared first; results are sorted and unique.
    pub fn query_aabb(&self, aabb: &Aabb, out: &mut Vec<Entity>) {
        out.clear();
        for cell in self.covered_cells(aabb) {
            if let Some(entries) = self.cells.get(&cell) {
                out.extend_from_slice(entries);
            }
        }
        out.sort_unstable();
        out.dedup();
    }

    /// Candidates whose cells contain `point`.
    pub fn query_point(&self, point: Vec3, out: &mut Vec<Entity>) {
        self.query_aabb(&Aabb::new(point, Vec3::ZERO), out);
    }

    /// Number of cells currently held, including ones emptied by the last clear.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Clear all entries. Cells that were used since the previous clear keep
    /// their allocation; cells left empty since then are dropped.
    pub fn clear(&mut self) {
        self.cells.retain(|_, entries| {
            let used = !entries.is_empty();
            entries.clear();
            used
        });
        self.len = 0;
    }
}

impl Default for SpatialHashGrid {
    fn default() -> Self {
        Self::new(SpatialHashConfig::default())
    }
}
