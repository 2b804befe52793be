//! Game model handed over by the authoring/persistence side
//!
//! The engine doesn't own any storage format. This is the shape it expects
//! to receive; `from_json` exists for hosts that keep games as JSON. A model
//! that fails validation is rejected at load time.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::sim::{Characteristic, Sprite, SpriteId, SpriteState, World};

/// A catalog entry that levels place by name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetModel {
    pub name: String,
    /// Visual reference, passed through to the renderer
    #[serde(default)]
    pub image: String,
    /// Width and height
    pub size: Vec2,
    #[serde(default)]
    pub characteristics: Vec<Characteristic>,
    #[serde(default)]
    pub states: Vec<SpriteState>,
}

impl PresetModel {
    fn to_sprite(&self) -> Sprite {
        let mut sprite = Sprite::new(SpriteId(0), self.name.clone(), Vec2::ZERO, self.size).as_preset();
        sprite.image = self.image.clone();
        sprite.characteristics = self.characteristics.clone();
        sprite.states = self.states.clone();
        sprite
    }
}

/// A preset placed in a level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Placement {
    pub preset: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub vx: f32,
    #[serde(default)]
    pub vy: f32,
    /// The player-controlled sprite of the level
    #[serde(default)]
    pub player: bool,
}

/// One level of a game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelModel {
    #[serde(default)]
    pub name: String,
    /// Background reference, opaque to the engine
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub sprites: Vec<Placement>,
}

/// A complete authored game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameModel {
    #[serde(default)]
    pub name: String,
    /// Ordered preset catalog
    #[serde(default)]
    pub presets: Vec<PresetModel>,
    pub levels: Vec<LevelModel>,
}

impl GameModel {
    /// Parse and validate a game from JSON
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: GameModel = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Reject models the engine cannot run without guessing
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.levels.is_empty() {
            return Err(ModelError::NoLevels);
        }

        let mut names = HashSet::new();
        for preset in &self.presets {
            if !names.insert(preset.name.as_str()) {
                return Err(ModelError::DuplicatePreset(preset.name.clone()));
            }
            let size_ok = preset.size.is_finite() && preset.size.x > 0.0 && preset.size.y > 0.0;
            if !size_ok {
                return Err(ModelError::InvalidSize {
                    preset: preset.name.clone(),
                });
            }
        }

        for (level, model) in self.levels.iter().enumerate() {
            if let Some(missing) = model.sprites.iter().find(|p| !names.contains(p.preset.as_str())) {
                return Err(ModelError::UnknownPreset {
                    level,
                    preset: missing.preset.clone(),
                });
            }
            if model.sprites.iter().filter(|p| p.player).count() > 1 {
                return Err(ModelError::MultiplePlayers { level });
            }
        }

        Ok(())
    }

    pub fn level(&self, index: usize) -> Option<&LevelModel> {
        self.levels.get(index)
    }

    /// Build the runtime world of one level: presets first, then instances
    /// cloned from them in placement order.
    pub fn build_world(&self, index: usize, seed: u64) -> Result<World, ModelError> {
        let level = self.levels.get(index).ok_or(ModelError::MissingLevel(index))?;
        let mut world = World::new(seed);

        for preset in &self.presets {
            world.add_preset(preset.to_sprite());
        }

        for placement in &level.sprites {
            let id = world
                .place_preset(&placement.preset, Vec2::new(placement.x, placement.y))
                .map_err(|_| ModelError::UnknownPreset {
                    level: index,
                    preset: placement.preset.clone(),
                })?;
            if let Some(sprite) = world.sprite_mut(id) {
                sprite.vel = Vec2::new(placement.vx, placement.vy);
                sprite.player = placement.player;
            }
        }

        log::info!(
            "Built level {} '{}': {} presets, {} sprites",
            index,
            level.name,
            world.presets().len(),
            world.sprites().len()
        );
        Ok(world)
    }
}
