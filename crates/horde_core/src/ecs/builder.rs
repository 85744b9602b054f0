use crate::ecs::storage::{ComponentValue, Value};
use crate::ecs::{Archetype, Component, ComponentId};
use thiserror::Error;

/// Fully constructed entity blueprint used during spawning.
pub struct EntityBlueprint {
    archetype: Archetype,
    components: Vec<Box<dyn ComponentValue>>,
}

impl EntityBlueprint {
    #[inline]
    pub fn archetype(&self) -> &Archetype {
        &self.archetype
    }

    /// Component values, sorted by component id.
    #[inline]
    pub fn components(&self) -> &[Box<dyn ComponentValue>] {
        &self.components
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntityBuilderError {
    #[error("entity blueprint has no components")]
    Empty,
}

/// Builder for constructing entity blueprints prior to spawning.
///
/// Adding the same component twice keeps the last value.
#[derive(Default)]
pub struct EntityBuilder {
    components: Vec<Box<dyn ComponentValue>>,
}

impl EntityBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a Rust-typed component by value.
    pub fn with<T: Component>(mut self, value: T) -> Self {
        T::ensure_registered();
        let boxed: Box<dyn ComponentValue> = Box::new(Value(value));
        match self
            .components
            .iter_mut()
            .find(|c| c.component_id() == T::ID)
        {
            Some(slot) => *slot = boxed,
            None => self.components.push(boxed),
        }
        self
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.components.iter().any(|c| c.component_id() == id)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Finalize the builder into an `EntityBlueprint` suitable for spawning.
    pub fn build(self) -> Result<EntityBlueprint, EntityBuilderError> {
        if self.components.is_empty() {
            return Err(EntityBuilderError::Empty);
        }

        let mut components = self.components;
        components.sort_by_key(|c| c.component_id());

        let archetype = Archetype::from_components(components.iter().map(|c| c.component_id()).collect());
        Ok(EntityBlueprint {
            archetype,
            components,
        })
    }
}
