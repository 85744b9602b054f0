// archetype_storage.rs - SoA storage for archetype entities
//
// Implements Structure-of-Arrays layout for cache-efficient entity storage.

use crate::ecs::{name_of, Archetype, Component, ComponentId, Entity};
use thiserror::Error;

use super::column::{downcast_slice_mut, Column, ComponentValue, ErasedColumn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("archetype has no column for component '{component}'")]
    MissingColumn { component: &'static str },

    #[error("value for component '{component}' does not match its column type")]
    ColumnTypeMismatch { component: &'static str },

    #[error("row {row} is out of bounds (len {len})")]
    RowOutOfBounds { row: usize, len: usize },
}

/// Storage for all entities of a single archetype.
///
/// Uses Structure-of-Arrays (SoA) layout for cache efficiency and
/// easy parallel iteration. Rows stay dense: removal swaps the last row
/// into the hole, so the row index of one entity may change.
pub struct ArchetypeStorage {
    pub archetype: Archetype, // The archetype this storage represents

    columns: Vec<Box<dyn ErasedColumn>>, // Same order as `archetype.components`

    entities: Vec<Entity>, // Maps row index to entity handle
}

impl ArchetypeStorage {
    /// Create storage with one empty column per blueprint value.
    pub(crate) fn from_values(archetype: Archetype, values: &[Box<dyn ComponentValue>]) -> Self {
        let mut columns: Vec<Box<dyn ErasedColumn>> = values.iter().map(|v| v.new_column()).collect();
        columns.sort_by_key(|c| c.component_id());
        debug_assert_eq!(
            columns.iter().map(|c| c.component_id()).collect::<Vec<_>>(),
            archetype.components
        );

        Self {
            archetype,
            columns,
            entities: Vec::new(),
        }
    }

    /// Append a row for `entity` and return its row index.
    ///
    /// `values` must be sorted by component id and match the archetype exactly.
    pub(crate) fn push_row(
        &mut self,
        entity: Entity,
        values: &[Box<dyn ComponentValue>],
    ) -> Result<usize, StorageError> {
        if values.len() != self.columns.len() {
            let missing = self
                .archetype
                .components
                .iter()
                .find(|id| !values.iter().any(|v| v.component_id() == **id))
                .copied()
                .unwrap_or_default();
            return Err(StorageError::MissingColumn {
                component: name_of(missing),
            });
        }

        // Validate every value before writing so a failed push leaves no partial row.
        for (column, value) in self.columns.iter().zip(values) {
            if column.component_id() != value.component_id() {
                return Err(StorageError::MissingColumn {
                    component: name_of(value.component_id()),
                });
            }
        }

        for (column, value) in self.columns.iter_mut().zip(values) {
            if !value.push_into(column.as_mut()) {
                return Err(StorageError::ColumnTypeMismatch {
                    component: name_of(value.component_id()),
                });
            }
        }

        let row = self.entities.len();
        self.entities.push(entity);
        Ok(row)
    }

    /// Remove a row. Returns the entity that was moved into `row`, if any.
    pub(crate) fn swap_remove(&mut self, row: usize) -> Result<Option<Entity>, StorageError> {
        let len = self.entities.len();
        if row >= len {
            return Err(StorageError::RowOutOfBounds { row, len });
        }
        for column in &mut self.columns {
            column.swap_remove(row);
        }
        self.entities.swap_remove(row);
        Ok(self.entities.get(row).copied())
    }

    /// Entity handles, indexed by row.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Get the number of live entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if storage is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn has_component(&self, id: ComponentId) -> bool {
        self.archetype.contains(id)
    }

    /// Get an immutable typed slice of all components of type T.
    pub fn column<T: Component>(&self) -> Option<&[T]> {
        let idx = self.archetype.position(T::ID)?;
        self.columns[idx]
            .as_any()
            .downcast_ref::<Column<T>>()
            .map(Column::as_slice)
    }

    /// Get a mutable typed slice of all components of type T.
    pub fn column_mut<T: Component>(&mut self) -> Option<&mut [T]> {
        let idx = self.archetype.position(T::ID)?;
        downcast_slice_mut::<T>(&mut self.columns[idx])
    }

    /// Get typed reference to a component at a specific row.
    pub fn get<T: Component>(&self, row: usize) -> Option<&T> {
        self.column::<T>()?.get(row)
    }

    /// Get typed mutable reference to a component at a specific row.
    pub fn get_mut<T: Component>(&mut self, row: usize) -> Option<&mut T> {
        self.column_mut::<T>()?.get_mut(row)
    }

    /// Borrow several distinct columns at once.
    ///
    /// Returns `None` if a component is missing or an id is repeated.
    /// Used by the `columns_mut!` macro.
    #[doc(hidden)]
    pub fn column_slots<const N: usize>(
        &mut self,
        ids: [ComponentId; N],
    ) -> Option<[&mut Box<dyn ErasedColumn>; N]> {
        let mut positions = [0usize; N];
        for (slot, id) in positions.iter_mut().zip(ids) {
            *slot = self.archetype.position(id)?;
        }
        self.columns.get_disjoint_mut(positions).ok()
    }
}
