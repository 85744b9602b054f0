//! Entity Component System core types.
//!
//! Components are plain `Copy` data registered under stable ids. Entities
//! with the same component set share one [`ArchetypeStorage`] laid out as
//! struct-of-arrays; systems borrow whole columns through the world and defer
//! structural changes to a [`CommandBuffer`].

mod archetype;
mod builder;
mod command;
mod component;
mod entity;
pub mod query;
pub mod storage;
mod system_descriptor;
mod system_handle;
mod system_registration_error;
mod system_registry;
mod world;

pub use archetype::{Archetype, ArchetypeId};
pub use builder::{EntityBlueprint, EntityBuilder, EntityBuilderError};
pub use command::{Command, CommandBuffer};
pub use component::{meta_of, name_of, register_component, Component, ComponentId, ComponentMeta};
pub use entity::{Entity, EntityLoc, Generation};
pub use query::{Query, SpatialHashConfig, SpatialHashGrid};
pub use storage::{ArchetypeStorage, StorageError};
pub use system_descriptor::SystemDescriptor;
pub use system_handle::SystemHandle;
pub use system_registration_error::SystemRegistrationError;
pub use system_registry::SystemRegistry;
pub use world::{World, WorldError};

/// Spawn an entity into the world using builder-style component construction.
///
/// Evaluates to `Result<Entity, WorldError>`.
#[macro_export]
macro_rules! spawn {
    ($world:expr $(, $component:expr)+ $(,)?) => {{
        let builder = $crate::ecs::EntityBuilder::new()$(.with($component))+;
        $world.spawn(builder)
    }};
}
