use crate::ecs::{Component, ComponentId};
use std::any::Any;

/// Type-erased view of a single component column.
///
/// Archetype storage keeps one boxed column per component; systems downcast
/// back to the typed [`Column`] to get plain slices.
pub trait ErasedColumn: Send + Sync {
    fn component_id(&self) -> ComponentId;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove a row by moving the last row into its place.
    fn swap_remove(&mut self, row: usize);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Tightly packed column of one component type.
pub struct Column<T: Component> {
    data: Vec<T>,
}

impl<T: Component> Column<T> {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, value: T) {
        self.data.push(value);
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T: Component> Default for Column<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ErasedColumn for Column<T> {
    fn component_id(&self) -> ComponentId {
        T::ID
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn swap_remove(&mut self, row: usize) {
        self.data.swap_remove(row);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Downcast an erased column slot to a typed slice.
///
/// Returns `None` when the column holds a different component type.
pub fn downcast_slice_mut<T: Component>(slot: &mut Box<dyn ErasedColumn>) -> Option<&mut [T]> {
    slot.as_any_mut()
        .downcast_mut::<Column<T>>()
        .map(Column::as_mut_slice)
}

/// One component value waiting to be written into a column.
///
/// Blueprints carry their components in this erased form so that a single
/// builder can hold any mix of component types.
pub trait ComponentValue: Send + Sync {
    fn component_id(&self) -> ComponentId;

    /// Create an empty column able to hold this value's type.
    fn new_column(&self) -> Box<dyn ErasedColumn>;

    /// Append the value to `column`; `false` if the column type differs.
    fn push_into(&self, column: &mut dyn ErasedColumn) -> bool;
}

pub(crate) struct Value<T: Component>(pub(crate) T);

impl<T: Component> ComponentValue for Value<T> {
    fn component_id(&self) -> ComponentId {
        T::ID
    }

    fn new_column(&self) -> Box<dyn ErasedColumn> {
        Box::new(Column::<T>::new())
    }

    fn push_into(&self, column: &mut dyn ErasedColumn) -> bool {
        match column.as_any_mut().downcast_mut::<Column<T>>() {
            Some(column) => {
                column.push(self.0);
                true
            }
            None => false,
        }
    }
}
