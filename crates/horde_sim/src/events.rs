//! Events raised during a tick, for score and UI collaborators.

use horde_core::ecs::Entity;
use horde_core::math::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Player health after this tick; raised whenever it changed.
    HealthChanged { current: f32, max: f32 },
    /// Raised once per session, on the tick the player's health hits zero.
    PlayerDefeated,
    /// An enemy was shot down; `points` go to the scoreboard.
    EnemyDestroyed { entity: Entity, points: u32 },
    /// An enemy reached the player and was used up. Awards nothing.
    EnemyConsumed { entity: Entity },
    FoodConsumed { entity: Entity, heal: f32 },
    BulletRecycled { entity: Entity },
    EnemiesSpawned { count: usize },
    FoodSpawned { entity: Entity, position: Vec3 },
}

/// Running score for the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub score: u64,
    pub kills: u32,
}

impl Scoreboard {
    pub fn record(&mut self, event: &GameEvent) {
        if let GameEvent::EnemyDestroyed { points, .. } = event {
            self.score += u64::from(*points);
            self.kills += 1;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
