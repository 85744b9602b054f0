//! Session configuration
//!
//! Read once when a [`Simulation`](crate::Simulation) is created. Keys are
//! camelCase; anything missing falls back to the prototype's tuning.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Shortest accepted spawn interval, in seconds.
pub const MIN_SPAWN_INTERVAL: f32 = 0.01;

/// What `fire` does when every pooled bullet is already in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PoolExhaustedPolicy {
    /// Re-fire the bullet that has been in flight the longest.
    #[default]
    RecycleOldest,
    /// Reject the request with `SimError::PoolExhausted`.
    Drop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct GameConfig {
    pub bullet_damage: f32,
    pub num_enemies: u32,
    /// World units per second.
    pub enemy_speed: f32,
    pub enemy_health: f32,
    /// Seconds between enemy waves; the first wave spawns on arming.
    pub enemy_spawn_interval: f32,
    /// Seconds between food drops; the first drop waits one interval.
    pub food_spawn_interval: f32,
    pub max_player_health: f32,
    /// Health lost per second by the player.
    pub health_degen_rate: f32,
    pub bullet_pool_size: usize,

    pub player_speed: f32,
    pub bullet_speed: f32,
    /// Seconds an unobstructed bullet stays in flight.
    pub bullet_lifetime: f32,
    pub enemy_contact_damage: f32,
    /// Defaults to `maxPlayerHealth` (food fully heals).
    pub food_heal_amount: Option<f32>,
    pub enemy_min_radius: f32,
    pub enemy_max_radius: f32,
    pub food_min_radius: f32,
    pub food_max_radius: f32,
    /// Active bullets farther than this from the origin are recycled.
    pub arena_radius: f32,
    pub separation_radius: f32,
    pub separation_force: f32,
    /// Scale added to every entity under a tap.
    pub grow_step: f32,
    pub seed: u64,
    pub pool_exhausted_policy: PoolExhaustedPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            bullet_damage: 5.0,
            num_enemies: 1,
            enemy_speed: 1.2,
            enemy_health: 10.0,
            enemy_spawn_interval: 10.0,
            food_spawn_interval: 20.0,
            max_player_health: 50.0,
            health_degen_rate: 1.0,
            bullet_pool_size: 25,

            player_speed: 5.0,
            bullet_speed: 15.0,
            bullet_lifetime: 3.0,
            enemy_contact_damage: 10.0,
            food_heal_amount: None,
            enemy_min_radius: 15.0,
            enemy_max_radius: 20.0,
            food_min_radius: 2.0,
            food_max_radius: 2.0,
            arena_radius: 50.0,
            separation_radius: 1.0,
            separation_force: 2.0,
            grow_step: 0.1,
            seed: 0x5EED,
            pool_exhausted_policy: PoolExhaustedPolicy::RecycleOldest,
        }
    }
}

impl GameConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(path = %path.display(), "loaded game config");
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn food_heal(&self) -> f32 {
        self.food_heal_amount.unwrap_or(self.max_player_health)
    }

    /// Score awarded for destroying one enemy.
    pub fn enemy_points(&self) -> u32 {
        self.enemy_health.round().max(0.0) as u32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("bulletDamage", self.bullet_damage)?;
        non_negative("enemySpeed", self.enemy_speed)?;
        positive("enemyHealth", self.enemy_health)?;
        at_least("enemySpawnInterval", self.enemy_spawn_interval, MIN_SPAWN_INTERVAL)?;
        at_least("foodSpawnInterval", self.food_spawn_interval, MIN_SPAWN_INTERVAL)?;
        positive("maxPlayerHealth", self.max_player_health)?;
        non_negative("healthDegenRate", self.health_degen_rate)?;
        if self.bullet_pool_size == 0 {
            return Err(invalid("bulletPoolSize", "must hold at least one bullet"));
        }

        non_negative("playerSpeed", self.player_speed)?;
        positive("bulletSpeed", self.bullet_speed)?;
        positive("bulletLifetime", self.bullet_lifetime)?;
        non_negative("enemyContactDamage", self.enemy_contact_damage)?;
        if let Some(heal) = self.food_heal_amount {
            non_negative("foodHealAmount", heal)?;
        }
        annulus("enemyMinRadius", "enemyMaxRadius", self.enemy_min_radius, self.enemy_max_radius)?;
        annulus("foodMinRadius", "foodMaxRadius", self.food_min_radius, self.food_max_radius)?;
        positive("arenaRadius", self.arena_radius)?;
        non_negative("separationRadius", self.separation_radius)?;
        non_negative("separationForce", self.separation_force)?;
        non_negative("growStep", self.grow_step)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be zero or more, got {value}")))
    }
}

fn at_least(field: &'static str, value: f32, min: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min {
        Ok(())
    } else {
        Err(invalid(field, format!("must be at least {min}, got {value}")))
    }
}

fn annulus(min_field: &'static str, max_field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    non_negative(min_field, min)?;
    non_negative(max_field, max)?;
    if max < min {
        return Err(invalid(max_field, format!("must be at least {min_field} ({min}), got {max}")));
    }
    Ok(())
}
