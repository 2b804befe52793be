//! Engine settings
//!
//! Supplied by the host alongside the game model. Everything that used to be
//! a process-wide constant (tick length, player speed) is threaded through
//! here so tests can run the engine with arbitrary tick sizes.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Engine parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    // === Timing ===
    /// Fixed simulation step handed to every tick (seconds)
    pub tick_dt: f32,
    /// Maximum fixed steps the animation loop runs per host frame
    pub max_substeps: u32,

    // === Player ===
    /// Speed applied to the player sprite while a movement key is held
    pub move_speed: f32,

    // === Gameplay ===
    /// Seed for spawner jitter
    pub seed: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tick_dt: SIM_DT,
            max_substeps: MAX_SUBSTEPS,
            move_speed: PLAYER_MOVE_SPEED,
            seed: DEFAULT_SEED,
        }
    }
}

impl EngineSettings {
    /// Parse settings from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Builder-style override of the tick length
    pub fn with_tick_dt(mut self, tick_dt: f32) -> Self {
        self.tick_dt = tick_dt;
        self
    }

    /// Check parameters the engine cannot clamp on its own
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.tick_dt.is_finite() || self.tick_dt <= 0.0 {
            return Err(SettingsError::TickDt(self.tick_dt));
        }
        if self.max_substeps == 0 {
            return Err(SettingsError::MaxSubsteps);
        }
        if !self.move_speed.is_finite() || self.move_speed < 0.0 {
            return Err(SettingsError::MoveSpeed(self.move_speed));
        }
        Ok(())
    }
}
