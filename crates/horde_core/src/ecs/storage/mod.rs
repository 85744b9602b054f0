// mod.rs - Storage module exports

mod archetype_storage;
mod column;
mod macros;

pub use archetype_storage::{ArchetypeStorage, StorageError};
pub use column::{downcast_slice_mut, Column, ComponentValue, ErasedColumn};
pub(crate) use column::Value;
