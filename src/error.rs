//! Error types
//!
//! Model and settings errors are returned to whoever loads a game. Simulation
//! errors never leave a tick: they are logged at the boundary of the
//! characteristic or action that raised them.

use thiserror::Error;

use crate::sim::SpriteId;

/// Problems with a game model handed over by the persistence side.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("game has no levels")]
    NoLevels,

    #[error("game has no level {0}")]
    MissingLevel(usize),

    #[error("level {level} references unknown preset '{preset}'")]
    UnknownPreset { level: usize, preset: String },

    #[error("preset '{0}' is defined more than once")]
    DuplicatePreset(String),

    #[error("preset '{preset}' has a non-positive size")]
    InvalidSize { preset: String },

    #[error("level {level} has more than one player sprite")]
    MultiplePlayers { level: usize },

    #[error("malformed game data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected engine settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("tick_dt must be positive and finite, got {0}")]
    TickDt(f32),

    #[error("max_substeps must be at least 1")]
    MaxSubsteps,

    #[error("move_speed must be non-negative and finite, got {0}")]
    MoveSpeed(f32),

    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of a single characteristic, state or action during a tick.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("sprite {0:?} is not in the active list")]
    MissingSprite(SpriteId),

    #[error("no preset named '{0}'")]
    UnknownPreset(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
}

/// Errors from constructing or reloading the engine facade.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("cannot read game file: {0}")]
    Io(#[from] std::io::Error),
}
