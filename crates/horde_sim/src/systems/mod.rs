//! Per-tick systems, in execution order.
//!
//! Each system is a free function over the [`World`](horde_core::ecs::World).
//! [`Stage`] names them and declares their component access so the order can
//! be registered with a [`SystemRegistry`] and checked for conflicts.

pub mod collision;
pub mod health;
pub mod movement;
pub mod pool_upkeep;
pub mod spatial_query;
pub mod steering;

use crate::components::*;
use horde_core::ecs::{Component, SystemDescriptor, SystemRegistrationError, SystemRegistry};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Steering,
    Movement,
    SpatialQuery,
    Collision,
    Health,
    PoolUpkeep,
}

impl Stage {
    /// Fixed tick order.
    pub const ORDER: [Stage; 6] = [
        Stage::Steering,
        Stage::Movement,
        Stage::SpatialQuery,
        Stage::Collision,
        Stage::Health,
        Stage::PoolUpkeep,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Steering => "steering",
            Stage::Movement => "movement",
            Stage::SpatialQuery => "spatial_query",
            Stage::Collision => "collision",
            Stage::Health => "health",
            Stage::PoolUpkeep => "pool_upkeep",
        }
    }

    /// Inverse of [`Stage::name`].
    pub fn from_name(name: &str) -> Option<Stage> {
        Stage::ORDER.into_iter().find(|stage| stage.name() == name)
    }

    pub fn descriptor(self) -> SystemDescriptor {
        let d = SystemDescriptor::new(self.name());
        match self {
            Stage::Steering => d
                .reads([Translation::ID, Player::ID, Enemy::ID])
                .write::<Movement>(),
            Stage::Movement => d
                .reads([Movement::ID, Scale::ID])
                .writes([Translation::ID, BoundingVolume::ID]),
            Stage::SpatialQuery => d
                .read::<Translation>()
                .writes([Scale::ID, BoundingVolume::ID]),
            Stage::Collision => d
                .reads([
                    BoundingVolume::ID,
                    HealthModifier::ID,
                    Player::ID,
                    Enemy::ID,
                    Bullet::ID,
                    Food::ID,
                ])
                .writes([
                    Health::ID,
                    PoolSlot::ID,
                    Movement::ID,
                    Translation::ID,
                    Scale::ID,
                    BoundingVolume::ID,
                ]),
            Stage::Health => d.read::<HealthRegen>().write::<Health>(),
            Stage::PoolUpkeep => d
                .read::<Bullet>()
                .writes([PoolSlot::ID, Movement::ID, Translation::ID, Scale::ID, BoundingVolume::ID]),
        }
    }
}

/// Registry holding every stage in tick order.
pub fn schedule() -> Result<SystemRegistry, SystemRegistrationError> {
    let mut registry = SystemRegistry::new();
    for stage in Stage::ORDER {
        registry.register(stage.descriptor())?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_matches_tick_order() {
        let registry = schedule().unwrap();
        let names: Vec<_> = registry.iter().map(|(_, d)| d.name().to_string()).collect();
        assert_eq!(
            names,
            ["steering", "movement", "spatial_query", "collision", "health", "pool_upkeep"]
        );
    }

    #[test]
    fn names_map_back_to_stages() {
        for stage in Stage::ORDER {
            assert_eq!(Stage::from_name(stage.name()), Some(stage));
        }
        assert_eq!(Stage::from_name("render"), None);
    }

    #[test]
    fn conflicting_neighbours_never_share_a_batch() {
        let registry = schedule().unwrap();
        let movement = registry.find("movement").unwrap();
        let collision = registry.find("collision").unwrap();
        assert!(registry.conflicts(movement, collision));
        for batch in registry.parallel_batches() {
            for (i, a) in batch.iter().enumerate() {
                for b in &batch[i + 1..] {
                    assert!(!registry.conflicts(*a, *b));
                }
            }
        }
    }
}
