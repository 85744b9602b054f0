// archetype.rs - Archetype identification
//
// An archetype is a unique set of component types.
// Entities with the same component types share the same archetype.

use crate::ecs::ComponentId;
use std::hash::{Hash, Hasher};

pub type ArchetypeId = u64;

/// An archetype represents a unique combination of component types.
///
/// The component IDs are always stored in sorted order to ensure
/// deterministic archetype ID calculation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Archetype {
    /// Hash-based unique identifier for this archetype.
    pub id: ArchetypeId,

    /// Sorted list of component IDs in this archetype.
    pub components: Vec<ComponentId>,
}

impl Archetype {
    /// Create an archetype from a list of component IDs.
    ///
    /// The input will be sorted and deduplicated.
    pub fn from_components(mut comps: Vec<ComponentId>) -> Self {
        comps.sort_unstable();
        comps.dedup();
        let id = hash_components(&comps);
        Self {
            id,
            components: comps,
        }
    }

    /// Check if this archetype contains a specific component.
    pub fn contains(&self, id: ComponentId) -> bool {
        self.components.binary_search(&id).is_ok()
    }

    /// Column position of a component inside this archetype's storage.
    pub fn position(&self, id: ComponentId) -> Option<usize> {
        self.components.binary_search(&id).ok()
    }

    pub fn contains_all(&self, ids: &[ComponentId]) -> bool {
        ids.iter().all(|&id| self.contains(id))
    }

    pub fn contains_any(&self, ids: &[ComponentId]) -> bool {
        ids.iter().any(|&id| self.contains(id))
    }
}

/// Compute a stable hash for a sorted list of component IDs.
fn hash_components(comps: &[ComponentId]) -> ArchetypeId {
    use std::collections::hash_map::DefaultHasher;
    let mut hasher = DefaultHasher::new();
    for &c in comps {
        c.hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_ignores_input_order_and_duplicates() {
        let a = Archetype::from_components(vec![3, 1, 2]);
        let b = Archetype::from_components(vec![2, 3, 1, 3]);
        assert_eq!(a.id, b.id);
        assert_eq!(a.components, vec![1, 2, 3]);
        assert_eq!(a.position(3), Some(2));
    }

    #[test]
    fn any_and_all_filters() {
        let a = Archetype::from_components(vec![10, 20]);
        assert!(a.contains_all(&[10, 20]));
        assert!(!a.contains_all(&[10, 30]));
        assert!(a.contains_any(&[30, 20]));
        assert!(!a.contains_any(&[30, 40]));
    }
}
