// world.rs - ECS World with entity management and iteration

use crate::ecs::command::Command;
use crate::ecs::{
    meta_of, ArchetypeId, ArchetypeStorage, CommandBuffer, Component, ComponentId,
    Entity, EntityBuilder, EntityBuilderError, EntityLoc, Generation, Query, StorageError,
};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("entity {entity} is not alive")]
    InvalidHandle { entity: Entity },

    #[error("entity {entity} has no '{component}' component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("cannot spawn an entity without components")]
    EmptyBlueprint,

    #[error("component id {component} is not registered")]
    ComponentNotRegistered { component: ComponentId },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Clone, Copy, Debug)]
struct EntitySlot {
    generation: Generation,
    loc: Option<EntityLoc>,
}

/// The main ECS world containing all entities and components.
///
/// An entity's archetype is fixed at spawn. Storages are kept in creation
/// order so iteration is deterministic run to run.
#[derive(Default)]
pub struct World {
    slots: Vec<EntitySlot>,
    free: Vec<u32>,
    storages: Vec<ArchetypeStorage>,
    storage_index: HashMap<ArchetypeId, usize>,
    comp_index: HashMap<ComponentId, Vec<usize>>,
    live: usize,
}

impl World {
    /// Create a new empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn an entity from a builder.
    ///
    /// Freed slots are reused with a bumped generation, so handles to the
    /// previous occupant stay invalid.
    pub fn spawn(&mut self, builder: EntityBuilder) -> Result<Entity, WorldError> {
        let blueprint = builder.build().map_err(|err| match err {
            EntityBuilderError::Empty => WorldError::EmptyBlueprint,
        })?;

        for &component in &blueprint.archetype().components {
            if meta_of(component).is_none() {
                return Err(WorldError::ComponentNotRegistered { component });
            }
        }

        // Get or create storage for this archetype
        let archetype_id = blueprint.archetype().id;
        let storage_idx = match self.storage_index.get(&archetype_id) {
            Some(&idx) => idx,
            None => {
                let idx = self.storages.len();
                self.storages.push(ArchetypeStorage::from_values(
                    blueprint.archetype().clone(),
                    blueprint.components(),
                ));
                self.storage_index.insert(archetype_id, idx);
                for &cid in &blueprint.archetype().components {
                    self.comp_index.entry(cid).or_default().push(idx);
                }
                idx
            }
        };

        let entity = match self.free.last() {
            Some(&index) => Entity::new(index, self.slots[index as usize].generation),
            None => Entity::new(self.slots.len() as u32, 0),
        };

        let row = self.storages[storage_idx].push_row(entity, blueprint.components())?;
        let loc = Some(EntityLoc {
            archetype: archetype_id,
            row,
        });

        if self.free.pop().is_some() {
            self.slots[entity.index() as usize].loc = loc;
        } else {
            self.slots.push(EntitySlot { generation: 0, loc });
        }
        self.live += 1;
        Ok(entity)
    }

    /// Despawn an entity.
    ///
    /// The slot is returned to the free list and its generation is incremented.
    pub fn despawn(&mut self, entity: Entity) -> Result<(), WorldError> {
        let loc = self.locate(entity)?;
        let storage_idx = self.storage_slot(entity, loc)?;

        if let Some(moved) = self.storages[storage_idx].swap_remove(loc.row)? {
            if let Some(slot) = self.slots.get_mut(moved.index() as usize) {
                slot.loc = Some(EntityLoc {
                    archetype: loc.archetype,
                    row: loc.row,
                });
            }
        }

        let slot = &mut self.slots[entity.index() as usize];
        slot.generation = slot.generation.wrapping_add(1);
        slot.loc = None;
        self.free.push(entity.index());
        self.live -= 1;
        Ok(())
    }

    /// Current location of a live entity.
    pub fn locate(&self, entity: Entity) -> Result<EntityLoc, WorldError> {
        self.slots
            .get(entity.index() as usize)
            .filter(|slot| slot.generation == entity.generation())
            .and_then(|slot| slot.loc)
            .ok_or(WorldError::InvalidHandle { entity })
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.locate(entity).is_ok()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Whether a live entity carries component `T`.
    pub fn has<T: Component>(&self, entity: Entity) -> Result<bool, WorldError> {
        let loc = self.locate(entity)?;
        let storage = &self.storages[self.storage_slot(entity, loc)?];
        Ok(storage.has_component(T::ID))
    }

    /// Copy of an entity's component.
    pub fn get<T: Component>(&self, entity: Entity) -> Result<T, WorldError> {
        self.get_ref::<T>(entity).copied()
    }

    pub fn get_ref<T: Component>(&self, entity: Entity) -> Result<&T, WorldError> {
        let loc = self.locate(entity)?;
        let storage = &self.storages[self.storage_slot(entity, loc)?];
        storage
            .get::<T>(loc.row)
            .ok_or(WorldError::MissingComponent {
                entity,
                component: T::NAME,
            })
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, WorldError> {
        let loc = self.locate(entity)?;
        let storage_idx = self.storage_slot(entity, loc)?;
        self.storages[storage_idx]
            .get_mut::<T>(loc.row)
            .ok_or(WorldError::MissingComponent {
                entity,
                component: T::NAME,
            })
    }

    /// Overwrite an existing component. Components cannot be added after spawn.
    pub fn set<T: Component>(&mut self, entity: Entity, value: T) -> Result<(), WorldError> {
        *self.get_mut::<T>(entity)? = value;
        Ok(())
    }

    /// All live entities whose archetype matches `query`, in storage order.
    pub fn query(&self, query: &Query) -> Vec<Entity> {
        self.storages_matching(query)
            .flat_map(|storage| storage.entities().iter().copied())
            .collect()
    }

    /// Count of live entities matching `query`.
    pub fn count(&self, query: &Query) -> usize {
        self.storages_matching(query).map(ArchetypeStorage::len).sum()
    }

    /// Despawn every entity matching `query`. Returns how many were removed.
    pub fn despawn_matching(&mut self, query: &Query) -> Result<usize, WorldError> {
        let doomed = self.query(query);
        for &entity in &doomed {
            self.despawn(entity)?;
        }
        Ok(doomed.len())
    }

    /// Apply queued commands in FIFO order and return the spawned entities.
    ///
    /// Despawns of entities that are already gone are skipped.
    pub fn apply_commands(&mut self, commands: &mut CommandBuffer) -> Result<Vec<Entity>, WorldError> {
        let mut spawned = Vec::new();
        for command in commands.drain() {
            match command {
                Command::Spawn(builder) => spawned.push(self.spawn(builder)?),
                Command::Despawn(entity) => {
                    if self.is_alive(entity) {
                        self.despawn(entity)?;
                    } else {
                        tracing::debug!(%entity, "skipping despawn of dead entity");
                    }
                }
            }
        }
        Ok(spawned)
    }

    /// Get all archetype storages in creation order.
    pub fn storages(&self) -> impl Iterator<Item = &ArchetypeStorage> {
        self.storages.iter()
    }

    /// Storages whose archetype matches `query`.
    pub fn storages_matching<'a>(
        &'a self,
        query: &'a Query,
    ) -> impl Iterator<Item = &'a ArchetypeStorage> + 'a {
        self.candidates(query)
            .into_iter()
            .map(move |idx| &self.storages[idx])
            .filter(move |storage| query.matches(&storage.archetype))
    }

    /// Execute a function on every storage matching `query`.
    ///
    /// Use `columns_mut!` inside the closure to borrow several columns at once.
    ///
    /// # Example
    /// ```ignore
    /// world.for_each_storage_mut(&Query::new().with::<Translation>().with::<Movement>(), |storage| {
    ///     if let Some((translation, movement)) = columns_mut!(storage, Translation, Movement) {
    ///         // update rows
    ///     }
    /// });
    /// ```
    pub fn for_each_storage_mut<F>(&mut self, query: &Query, mut f: F)
    where
        F: FnMut(&mut ArchetypeStorage),
    {
        for idx in self.candidates(query) {
            let storage = &mut self.storages[idx];
            if query.matches(&storage.archetype) {
                f(storage);
            }
        }
    }

    /// Storage indices worth testing against `query`, ascending.
    fn candidates(&self, query: &Query) -> Vec<usize> {
        match query.required().first() {
            Some(first) => {
                let mut idx = self.comp_index.get(first).cloned().unwrap_or_default();
                idx.sort_unstable();
                idx
            }
            None => (0..self.storages.len()).collect(),
        }
    }

    fn storage_slot(&self, entity: Entity, loc: EntityLoc) -> Result<usize, WorldError> {
        self.storage_index
            .get(&loc.archetype)
            .copied()
            .ok_or(WorldError::InvalidHandle { entity })
    }
}
