//! Sprite Engine - runtime simulation core for player-authored 2D games
//!
//! Core modules:
//! - `sim`: Deterministic tick (move, collide, dispatch characteristics, update states, commit)
//! - `player`: Engine facade, animation loop and input plumbing for the host
//! - `model`: Game/level/preset data handed over by the authoring side
//! - `settings`: Tunable engine parameters
//! - `error`: Error types surfaced at load time and at unit boundaries

pub mod error;
pub mod model;
pub mod player;
pub mod settings;
pub mod sim;

pub use error::{EngineError, ModelError, SettingsError, SimError};
pub use model::{GameModel, LevelModel, Placement};
pub use player::{AnimationLoop, MovementKey, PlayerController, SpriteView, StopHandle};
pub use settings::EngineSettings;

/// Engine configuration constants
pub mod consts {
    /// Default fixed simulation timestep (60 Hz, matches the host refresh cadence)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest real-time gap a single frame may report (seconds)
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Player movement speed (pixels/s) when a movement key is held
    pub const PLAYER_MOVE_SPEED: f32 = 180.0;
    /// Pain a `Visible` state absorbs before its sprite is hidden
    pub const DEFAULT_PAIN_THRESHOLD: f64 = 100.0;
    /// Default seed for spawner jitter
    pub const DEFAULT_SEED: u64 = 0x5EED;
    /// Undrained events a world keeps before dropping the oldest half
    pub const MAX_PENDING_EVENTS: usize = 4096;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
