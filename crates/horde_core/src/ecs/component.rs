// component.rs - Runtime component registration
//
// Components are identified by u32 IDs rather than Rust TypeIds so that
// archetype hashes and query filters stay stable across builds.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::mem::{align_of, size_of};
use std::sync::{PoisonError, RwLock};

pub type ComponentId = u32;

/// Metadata describing a component's memory layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentMeta {
    pub id: ComponentId,
    pub name: &'static str,
    pub size: usize,
    pub align: usize,
}

/// Global registry for every component type the world has seen.
static REGISTRY: Lazy<RwLock<HashMap<ComponentId, ComponentMeta>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Register a component's metadata.
///
/// Re-registering the same id is allowed as long as the layout matches;
/// two different types claiming one id is a programming error and panics.
pub fn register_component(meta: ComponentMeta) {
    let mut map = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(prev) = map.insert(meta.id, meta.clone()) {
        assert_eq!(
            (prev.name, prev.size, prev.align),
            (meta.name, meta.size, meta.align),
            "component id {} registered twice with different layouts",
            meta.id
        );
    }
}

/// Look up component metadata by ID.
pub fn meta_of(id: ComponentId) -> Option<ComponentMeta> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .cloned()
}

/// Human-readable name for a component id, for logs and errors.
pub fn name_of(id: ComponentId) -> &'static str {
    meta_of(id).map(|meta| meta.name).unwrap_or("<unregistered>")
}

/// Trait for plain-data components.
///
/// Components are `Copy` so columns can hand out values without cloning
/// logic, and `Send + Sync` so systems can iterate columns in parallel.
pub trait Component: 'static + Copy + Send + Sync {
    /// Globally unique component ID.
    const ID: ComponentId;

    /// Human-readable name for debugging.
    const NAME: &'static str;

    /// Register this component's layout with the global registry.
    fn ensure_registered() {
        register_component(ComponentMeta {
            id: Self::ID,
            name: Self::NAME,
            size: size_of::<Self>(),
            align: align_of::<Self>(),
        });
    }
}

/// Helper macro to implement Component trait.
///
/// # Example
/// ```ignore
/// #[derive(Clone, Copy)]
/// struct Position { x: f32, y: f32 }
///
/// define_component!(Position, 1, "Position");
/// ```
#[macro_export]
macro_rules! define_component {
    ($ty:ty, $id:expr, $name:expr) => {
        impl $crate::ecs::Component for $ty {
            const ID: $crate::ecs::ComponentId = $id;
            const NAME: &'static str = $name;
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy)]
    struct Marker;
    crate::define_component!(Marker, 9_001, "Marker");

    #[test]
    fn registration_is_idempotent() {
        Marker::ensure_registered();
        Marker::ensure_registered();
        let meta = meta_of(Marker::ID).expect("registered");
        assert_eq!(meta.name, "Marker");
        assert_eq!(meta.size, 0);
        assert_eq!(name_of(Marker::ID), "Marker");
    }

    #[test]
    fn unknown_ids_have_placeholder_name() {
        assert_eq!(name_of(u32::MAX), "<unregistered>");
    }
}
