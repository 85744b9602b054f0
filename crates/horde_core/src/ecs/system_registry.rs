use crate::ecs::{SystemDescriptor, SystemHandle, SystemRegistrationError};
use std::collections::HashMap;

/// Ordered set of system descriptors.
///
/// Registration order is execution order. Several systems may write the same
/// component; the registry only reports which neighbours could share a batch.
#[derive(Default)]
pub struct SystemRegistry {
    systems: Vec<SystemDescriptor>,
    name_lookup: HashMap<String, SystemHandle>,
}

impl SystemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        descriptor: SystemDescriptor,
    ) -> Result<SystemHandle, SystemRegistrationError> {
        if descriptor.is_empty() {
            return Err(SystemRegistrationError::EmptyAccess {
                name: descriptor.name().to_string(),
            });
        }

        let name_key = descriptor.name().to_string();
        if self.name_lookup.contains_key(&name_key) {
            return Err(SystemRegistrationError::DuplicateName { name: name_key });
        }

        let handle = SystemHandle::new(self.systems.len() as u32);
        tracing::debug!(system = %name_key, %handle, "system registered");
        self.name_lookup.insert(name_key, handle);
        self.systems.push(descriptor);
        Ok(handle)
    }

    pub fn descriptor(&self, handle: SystemHandle) -> Option<&SystemDescriptor> {
        self.systems.get(handle.index() as usize)
    }

    pub fn find(&self, name: &str) -> Option<SystemHandle> {
        self.name_lookup.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Whether two registered systems touch a component in a read/write or write/write way.
    pub fn conflicts(&self, a: SystemHandle, b: SystemHandle) -> bool {
        match (self.descriptor(a), self.descriptor(b)) {
            (Some(a), Some(b)) => a.conflicts_with(b),
            _ => false,
        }
    }

    /// Group systems into consecutive batches with no internal conflicts.
    ///
    /// Execution order is preserved: a batch only ever holds neighbours.
    pub fn parallel_batches(&self) -> Vec<Vec<SystemHandle>> {
        let mut batches: Vec<Vec<SystemHandle>> = Vec::new();
        for (handle, descriptor) in self.iter() {
            let fits = batches.last().is_some_and(|batch| {
                batch
                    .iter()
                    .filter_map(|h| self.descriptor(*h))
                    .all(|other| !other.conflicts_with(descriptor))
            });
            match batches.last_mut() {
                Some(batch) if fits => batch.push(handle),
                _ => batches.push(vec![handle]),
            }
        }
        batches
    }

    pub fn iter(&self) -> impl Iterator<Item = (SystemHandle, &SystemDescriptor)> {
        self.systems
            .iter()
            .enumerate()
            .map(|(index, descriptor)| (SystemHandle::new(index as u32), descriptor))
    }
}
