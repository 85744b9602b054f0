use crate::ecs::{Component, ComponentId};

/// Metadata describing how a system interacts with the ECS world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SystemDescriptor {
    name: String,
    reads: Vec<ComponentId>,
    writes: Vec<ComponentId>,
    components: Vec<ComponentId>,
}

impl SystemDescriptor {
    /// Create a new descriptor with the provided name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reads: Vec::new(),
            writes: Vec::new(),
            components: Vec::new(),
        }
    }

    /// Declare a read of component `T`.
    pub fn read<T: Component>(mut self) -> Self {
        self.reads.push(T::ID);
        self.rebuild_components();
        self
    }

    /// Declare a write of component `T`.
    pub fn write<T: Component>(mut self) -> Self {
        self.writes.push(T::ID);
        self.rebuild_components();
        self
    }

    /// Replace the read-only component set for this system.
    pub fn reads<I>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = ComponentId>,
    {
        self.reads = components.into_iter().collect();
        self.rebuild_components();
        self
    }

    /// Replace the write component set for this system.
    pub fn writes<I>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = ComponentId>,
    {
        self.writes = components.into_iter().collect();
        self.rebuild_components();
        self
    }

    /// Unique system name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read-only component set. A component that is also written is listed only as a write.
    pub fn read_components(&self) -> &[ComponentId] {
        &self.reads
    }

    /// Writable component set.
    pub fn write_components(&self) -> &[ComponentId] {
        &self.writes
    }

    /// Union of read and write component ids.
    pub fn all_components(&self) -> &[ComponentId] {
        &self.components
    }

    /// Whether the descriptor touches any components at all.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Two systems conflict when either writes a component the other touches.
    pub fn conflicts_with(&self, other: &SystemDescriptor) -> bool {
        let touches = |d: &SystemDescriptor, id: &ComponentId| d.components.binary_search(id).is_ok();
        self.writes.iter().any(|id| touches(other, id))
            || other.writes.iter().any(|id| touches(self, id))
    }

    fn rebuild_components(&mut self) {
        self.writes = sanitize(std::mem::take(&mut self.writes));
        let writes = &self.writes;
        let mut reads = sanitize(std::mem::take(&mut self.reads));
        reads.retain(|id| writes.binary_search(id).is_err());
        self.reads = reads;

        self.components.clear();
        self.components.extend(&self.reads);
        self.components.extend(&self.writes);
        self.components.sort_unstable();
    }
}

fn sanitize(mut list: Vec<ComponentId>) -> Vec<ComponentId> {
    list.sort_unstable();
    list.dedup();
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_shadows_read_of_same_component() {
        let d = SystemDescriptor::new("move").reads([3, 1, 1]).writes([1, 2]);
        assert_eq!(d.read_components(), &[3]);
        assert_eq!(d.write_components(), &[1, 2]);
        assert_eq!(d.all_components(), &[1, 2, 3]);
    }

    #[test]
    fn shared_reads_do_not_conflict() {
        let a = SystemDescriptor::new("a").reads([1]).writes([2]);
        let b = SystemDescriptor::new("b").reads([1]).writes([3]);
        let c = SystemDescriptor::new("c").reads([2]);
        assert!(!a.conflicts_with(&b));
        assert!(a.conflicts_with(&c));
        assert!(c.conflicts_with(&a));
    }
}
