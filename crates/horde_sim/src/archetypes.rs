//! Entity blueprints, one per kind.
//!
//! Every kind has a fixed component set, so each lands in its own archetype
//! storage and never migrates.

use crate::components::*;
use crate::config::GameConfig;
use horde_core::ecs::{Component, Entity, EntityBuilder, Query, World, WorldError};
use horde_core::math::Vec3;

/// Where idle bullets wait, well outside the arena.
pub const IDLE_BULLET_POSITION: Vec3 = Vec3::new(1000.0, 0.0, 0.0);

pub const PLAYER_SCALE: f32 = 1.0;
pub const ENEMY_SCALE: f32 = 0.5;
pub const BULLET_SCALE: f32 = 0.1;
pub const FOOD_SCALE: f32 = 0.4;

pub const QUAD_MESH: MeshId = MeshId(0);
pub const PLAYER_MATERIAL: MaterialId = MaterialId(0);
pub const ENEMY_MATERIAL: MaterialId = MaterialId(1);
pub const BULLET_MATERIAL: MaterialId = MaterialId(2);
pub const FOOD_MATERIAL: MaterialId = MaterialId(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Enemy,
    Bullet,
    Food,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [Self::Player, Self::Enemy, Self::Bullet, Self::Food];

    /// Query selecting every entity of this kind.
    pub fn query(self) -> Query {
        match self {
            Self::Player => Query::new().with::<Player>(),
            Self::Enemy => Query::new().with::<Enemy>(),
            Self::Bullet => Query::new().with::<Bullet>(),
            Self::Food => Query::new().with::<Food>(),
        }
    }

    /// Kind of a live entity, from its tag.
    pub fn of(world: &World, entity: Entity) -> Result<Option<EntityKind>, WorldError> {
        for kind in Self::ALL {
            let tagged = match kind {
                Self::Player => world.has::<Player>(entity)?,
                Self::Enemy => world.has::<Enemy>(entity)?,
                Self::Bullet => world.has::<Bullet>(entity)?,
                Self::Food => world.has::<Food>(entity)?,
            };
            if tagged {
                return Ok(Some(kind));
            }
        }
        Ok(None)
    }
}

/// Enemy and food, the kinds cleared on restart.
pub fn transient_query() -> Query {
    Query::new().any_of(&[Enemy::ID, Food::ID])
}

fn placed(position: Vec3, scale: f32, material: MaterialId) -> EntityBuilder {
    let translation = Translation { position };
    let scale = Scale { value: scale };
    EntityBuilder::new()
        .with(translation)
        .with(scale)
        .with(BoundingVolume::from_translation_scale(&translation, &scale))
        .with(Appearance {
            mesh: QUAD_MESH,
            material,
        })
}

pub fn player(config: &GameConfig, position: Vec3) -> EntityBuilder {
    placed(position, PLAYER_SCALE, PLAYER_MATERIAL)
        .with(Movement {
            speed: config.player_speed,
            direction: Vec3::ZERO,
        })
        .with(Health::full(config.max_player_health))
        .with(HealthRegen {
            rate: -config.health_degen_rate,
        })
        .with(Player)
}

pub fn enemy(config: &GameConfig, position: Vec3) -> EntityBuilder {
    placed(position, ENEMY_SCALE, ENEMY_MATERIAL)
        .with(Movement {
            speed: config.enemy_speed,
            direction: Vec3::ZERO,
        })
        .with(Health::full(config.enemy_health))
        .with(HealthModifier {
            amount: -config.enemy_contact_damage,
        })
        .with(Enemy {
            points: config.enemy_points(),
        })
}

/// A parked, idle bullet.
pub fn bullet(config: &GameConfig) -> EntityBuilder {
    placed(IDLE_BULLET_POSITION, BULLET_SCALE, BULLET_MATERIAL)
        .with(Movement::default())
        .with(HealthModifier {
            amount: -config.bullet_damage,
        })
        .with(PoolSlot::default())
        .with(Bullet)
}

pub fn food(config: &GameConfig, position: Vec3) -> EntityBuilder {
    placed(position, FOOD_SCALE, FOOD_MATERIAL)
        .with(HealthModifier {
            amount: config.food_heal(),
        })
        .with(Food)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_kind_gets_its_own_archetype() {
        let config = GameConfig::default();
        let mut world = World::new();
        let p = world.spawn(player(&config, Vec3::ZERO)).unwrap();
        let e = world.spawn(enemy(&config, Vec3::X)).unwrap();
        let b = world.spawn(bullet(&config)).unwrap();
        let f = world.spawn(food(&config, Vec3::Y)).unwrap();

        assert_eq!(world.storages().count(), 4);
        assert_eq!(EntityKind::of(&world, p).unwrap(), Some(EntityKind::Player));
        assert_eq!(EntityKind::of(&world, f).unwrap(), Some(EntityKind::Food));
        assert!(!world.has::<Movement>(f).unwrap());
        assert!(!world.has::<Health>(b).unwrap());
        assert_eq!(world.get::<HealthModifier>(e).unwrap().amount, -10.0);
        assert_eq!(world.get::<Translation>(b).unwrap().position, IDLE_BULLET_POSITION);
        assert_eq!(world.query(&transient_query()), vec![e, f]);
    }
}
