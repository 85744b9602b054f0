//! Archetype-level query filters and the spatial broad phase.

mod spatial_hash;

pub use spatial_hash::{SpatialHashConfig, SpatialHashGrid};

use crate::ecs::{Archetype, Component, ComponentId};

/// Component filter evaluated per archetype.
///
/// An archetype matches when it has every `all` component, at least one
/// `any` component (if any are listed) and none of the `none` components.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    all: Vec<ComponentId>,
    any: Vec<ComponentId>,
    none: Vec<ComponentId>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require component `T`.
    pub fn with<T: Component>(mut self) -> Self {
        push_unique(&mut self.all, T::ID);
        self
    }

    /// Exclude archetypes carrying `T`.
    pub fn without<T: Component>(mut self) -> Self {
        push_unique(&mut self.none, T::ID);
        self
    }

    /// Require at least one of `ids`.
    pub fn any_of(mut self, ids: &[ComponentId]) -> Self {
        for &id in ids {
            push_unique(&mut self.any, id);
        }
        self
    }

    pub fn matches(&self, archetype: &Archetype) -> bool {
        archetype.contains_all(&self.all)
            && (self.any.is_empty() || archetype.contains_any(&self.any))
            && !archetype.contains_any(&self.none)
    }

    pub fn required(&self) -> &[ComponentId] {
        &self.all
    }
}

fn push_unique(ids: &mut Vec<ComponentId>, id: ComponentId) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy)]
    struct Red;
    crate::define_component!(Red, 9_401, "Red");

    #[derive(Clone, Copy)]
    struct Blue;
    crate::define_component!(Blue, 9_402, "Blue");

    #[derive(Clone, Copy)]
    struct Big;
    crate::define_component!(Big, 9_403, "Big");

    #[test]
    fn any_of_matches_either_tag() {
        let q = Query::new().any_of(&[Red::ID, Blue::ID]);
        assert!(q.matches(&Archetype::from_components(vec![Red::ID])));
        assert!(q.matches(&Archetype::from_components(vec![Blue::ID, Big::ID])));
        assert!(!q.matches(&Archetype::from_components(vec![Big::ID])));
    }

    #[test]
    fn all_and_none_combine() {
        let q = Query::new().with::<Big>().without::<Red>();
        assert!(q.matches(&Archetype::from_components(vec![Big::ID, Blue::ID])));
        assert!(!q.matches(&Archetype::from_components(vec![Big::ID, Red::ID])));
        assert!(!q.matches(&Archetype::from_components(vec![Blue::ID])));
    }
}
