//! Horde Sim - one-vs-many survival simulation
//!
//! A player, waves of enemies steering toward it, food that heals and a
//! fixed pool of reusable bullets, all as entities in a `horde_core` world.
//!
//! # Architecture
//!
//! - **components / archetypes**: plain data and one blueprint per entity kind
//! - **systems**: per-tick passes (steering, movement, spatial query,
//!   collision, health, pool upkeep) run in a fixed order
//! - **pool / spawner**: bullet reuse and seeded enemy/food placement
//! - **session**: lifecycle state machine and the tick driver
//!
//! ```ignore
//! let mut sim = Simulation::new(GameConfig::default())?;
//! sim.start()?;
//! let report = sim.tick(TICK_SECONDS, TickInput::firing(Vec3::X))?;
//! ```

pub mod archetypes;
pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod input;
pub mod pool;
pub mod render;
pub mod session;
pub mod spawner;
pub mod systems;

pub use archetypes::EntityKind;
pub use config::{GameConfig, PoolExhaustedPolicy};
pub use error::{ConfigError, SimError, SimResult};
pub use events::{GameEvent, Scoreboard};
pub use input::TickInput;
pub use pool::BulletPool;
pub use render::{render_snapshot, RenderInstance};
pub use session::{Hud, SessionState, Simulation, TickReport};
pub use systems::Stage;
