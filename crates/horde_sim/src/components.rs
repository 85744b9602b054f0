//! Game components
//!
//! Every component is plain `Copy` data registered under a fixed id.

use horde_core::define_component;
use horde_core::ecs::Component;
use horde_core::math::{Aabb, Vec3};

/// Per-entity velocity split into speed and facing.
///
/// `speed == 0` means the entity is parked.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Movement {
    pub speed: f32,
    pub direction: Vec3,
}
define_component!(Movement, 1, "Movement");

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Translation {
    pub position: Vec3,
}
define_component!(Translation, 2, "Translation");

/// Uniform scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    pub value: f32,
}
define_component!(Scale, 3, "Scale");

impl Default for Scale {
    fn default() -> Self {
        Self { value: 1.0 }
    }
}

/// Hit points. Every write path clamps to `[0, max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}
define_component!(Health, 4, "Health");

impl Health {
    pub fn full(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    /// Add a signed delta and clamp. Returns the change actually applied.
    pub fn apply(&mut self, delta: f32) -> f32 {
        let before = self.current;
        self.current = (self.current + delta).clamp(0.0, self.max);
        self.current - before
    }

    pub fn reset(&mut self) {
        self.current = self.max;
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }
}

/// Signed health change per second.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HealthRegen {
    pub rate: f32,
}
define_component!(HealthRegen, 5, "HealthRegen");

/// Signed health delta applied once to whatever this entity touches.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HealthModifier {
    pub amount: f32,
}
define_component!(HealthModifier, 6, "HealthModifier");

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingVolume {
    pub aabb: Aabb,
}
define_component!(BoundingVolume, 7, "BoundingVolume");

impl BoundingVolume {
    pub fn from_translation_scale(translation: &Translation, scale: &Scale) -> Self {
        Self {
            aabb: Aabb::from_position_scale(translation.position, scale.value),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MeshId(pub u32);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

/// Opaque render binding handed to the renderer untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Appearance {
    pub mesh: MeshId,
    pub material: MaterialId,
}
define_component!(Appearance, 8, "Appearance");

/// Bookkeeping for pooled entities.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PoolSlot {
    pub active: bool,
    /// Seconds since the last activation.
    pub age: f32,
    /// Activation order; larger is newer.
    pub serial: u64,
}
define_component!(PoolSlot, 9, "PoolSlot");

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Player;
define_component!(Player, 10, "Player");

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Enemy {
    /// Score awarded when this enemy is destroyed.
    pub points: u32,
}
define_component!(Enemy, 11, "Enemy");

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bullet;
define_component!(Bullet, 12, "Bullet");

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Food;
define_component!(Food, 13, "Food");

/// Register every game component. Safe to call repeatedly.
pub fn register_all() {
    Movement::ensure_registered();
    Translation::ensure_registered();
    Scale::ensure_registered();
    Health::ensure_registered();
    HealthRegen::ensure_registered();
    HealthModifier::ensure_registered();
    BoundingVolume::ensure_registered();
    Appearance::ensure_registered();
    PoolSlot::ensure_registered();
    Player::ensure_registered();
    Enemy::ensure_registered();
    Bullet::ensure_registered();
    Food::ensure_registered();
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn health_clamps_both_ways() {
        let mut h = Health { current: 10.0, max: 10.0 };
        assert_eq!(h.apply(-15.0), -10.0);
        assert_eq!(h.current, 0.0);
        assert!(!h.is_alive());
        assert_eq!(h.apply(50.0), 10.0);
        assert_eq!(h.current, 10.0);
        h.current = 3.0;
        h.reset();
        assert_eq!(h.current, h.max);
    }

    #[test]
    fn bounds_follow_scale() {
        let bv = BoundingVolume::from_translation_scale(
            &Translation { position: Vec3::new(1.0, 2.0, 0.0) },
            &Scale { value: 0.4 },
        );
        assert_relative_eq!(bv.aabb.extents.x, 0.2);
        assert_eq!(bv.aabb.center, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn registry_knows_game_components() {
        register_all();
        assert_eq!(horde_core::ecs::name_of(PoolSlot::ID), "PoolSlot");
    }
}
