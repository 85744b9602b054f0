use crate::session::SessionState;
use horde_core::ecs::{SystemRegistrationError, WorldError};
use horde_core::time::TimerError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    World(#[from] WorldError),

    #[error("bullet pool exhausted ({capacity} bullets in flight)")]
    PoolExhausted { capacity: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("cannot {action} while {from}")]
    InvalidTransition {
        from: SessionState,
        action: &'static str,
    },

    #[error("invalid time step {dt}: must be finite and not negative")]
    InvalidTimeStep { dt: f32 },

    #[error(transparent)]
    Timer(#[from] TimerError),

    #[error(transparent)]
    Schedule(#[from] SystemRegistrationError),
}

pub type SimResult<T> = Result<T, SimError>;
