//! Horde Core
//!
//! Contains the fundamental simulation building blocks:
//! - Entity Component System (ECS) with archetype storage
//! - Spatial broad phase for bounding-volume queries
//! - Simulation time and tick-boundary timers
//! - Math (glam re-export plus axis-aligned boxes)

pub mod ecs;
pub mod math;
pub mod time;

pub use glam;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
