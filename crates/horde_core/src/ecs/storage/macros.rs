// macros.rs - Macros for accessing component columns
//
// These macros provide a safe, ergonomic interface for accessing multiple
// component slices simultaneously from archetype storage.

/// Macro to get one or more mutable component slices from a storage.
///
/// Evaluates to `Option<&mut [T]>` for a single component, or to an
/// `Option` of a tuple of slices for several. `None` means the archetype
/// lacks one of the components or the same component was named twice.
///
/// # Example
/// ```ignore
/// let positions = columns_mut!(storage, Translation);
/// if let Some((positions, movement)) = columns_mut!(storage, Translation, Movement) {
///     for (p, m) in positions.iter_mut().zip(movement.iter()) {
///         p.position += m.direction * m.speed * dt;
///     }
/// }
/// ```
#[macro_export]
macro_rules! columns_mut {
    // Single component - just call the method directly
    ($storage:expr, $T:ty $(,)?) => {
        $crate::ecs::ArchetypeStorage::column_mut::<$T>($storage)
    };

    ($storage:expr, $($T:ty),+ $(,)?) => {{
        let storage: &mut $crate::ecs::ArchetypeStorage = $storage;
        let slots = storage.column_slots([$(<$T as $crate::ecs::Component>::ID),+]);
        (move || {
            let mut slots = slots?.into_iter();
            Some(($(
                $crate::ecs::storage::downcast_slice_mut::<$T>(slots.next()?)?,
            )+))
        })()
    }};
}
