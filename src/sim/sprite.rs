//! Sprite entity record
//!
//! A sprite is a box in screen space (y grows downward) that owns its
//! behaviors. Presets live in the catalog and are only ever cloned; instances
//! are what the simulation moves around.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::characteristic::Characteristic;
use super::state::SpriteState;

/// Stable identity of a sprite within one world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpriteId(pub u32);

/// Whether a sprite is a catalog prototype or a placed entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpriteRole {
    /// Browsable catalog entry, never simulated
    Preset,
    /// Placed in a level or spawned at runtime
    #[default]
    Instance,
}

/// Axis-aligned bounds, min corner is top-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    /// Strict overlap; boxes that only share an edge don't overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// An entity in the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprite {
    pub id: SpriteId,
    #[serde(default)]
    pub role: SpriteRole,
    /// Preset name this sprite was cloned from (or its own name for presets)
    pub name: String,
    /// Visual reference, opaque to the engine
    #[serde(default)]
    pub image: String,
    /// Top-left corner
    pub pos: Vec2,
    #[serde(default)]
    pub vel: Vec2,
    /// Width and height
    pub size: Vec2,
    /// Orientation in radians, normalized to [-π, π)
    #[serde(default)]
    pub rotation: f32,
    /// Marks the player-controlled entity
    #[serde(default)]
    pub player: bool,
    /// Score credited to this sprite
    #[serde(default)]
    pub score: f64,
    /// Damage taken during the current tick (fed to states, then cleared)
    #[serde(skip)]
    pub pain: f64,
    #[serde(default)]
    pub characteristics: Vec<Characteristic>,
    #[serde(default)]
    pub states: Vec<SpriteState>,
}

impl Sprite {
    pub fn new(id: SpriteId, name: impl Into<String>, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            role: SpriteRole::Instance,
            name: name.into(),
            image: String::new(),
            pos,
            vel: Vec2::ZERO,
            size,
            rotation: 0.0,
            player: false,
            score: 0.0,
            pain: 0.0,
            characteristics: Vec::new(),
            states: Vec::new(),
        }
    }

    pub fn with_vel(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_characteristic(mut self, characteristic: Characteristic) -> Self {
        self.characteristics.push(characteristic);
        self
    }

    pub fn with_state(mut self, state: SpriteState) -> Self {
        self.states.push(state);
        self
    }

    pub fn as_player(mut self) -> Self {
        self.player = true;
        self
    }

    pub fn as_preset(mut self) -> Self {
        self.role = SpriteRole::Preset;
        self
    }

    /// Current bounds
    pub fn aabb(&self) -> Aabb {
        Aabb {
            min: self.pos,
            max: self.pos + self.size,
        }
    }

    /// Clone this sprite into a fresh level instance at `pos`.
    ///
    /// Every characteristic and state is copied, so the instance never shares
    /// behavior data with its preset. Runtime bookkeeping (score, pain,
    /// velocity of the preset) starts from the preset's authored values.
    pub fn instantiate(&self, id: SpriteId, pos: Vec2) -> Sprite {
        Sprite {
            id,
            role: SpriteRole::Instance,
            name: self.name.clone(),
            image: self.image.clone(),
            pos,
            vel: self.vel,
            size: self.size,
            rotation: self.rotation,
            player: self.player,
            score: 0.0,
            pain: 0.0,
            characteristics: self.characteristics.iter().map(Characteristic::copy).collect(),
            states: self.states.iter().map(SpriteState::copy).collect(),
        }
    }

    /// Whether any state has reached its terminal condition
    pub fn is_spent(&self) -> bool {
        self.states.iter().any(SpriteState::is_terminal)
    }

    /// Visibility as seen by the renderer (visible unless a `Visible` state says otherwise)
    pub fn is_visible(&self) -> bool {
        self.states.iter().all(|s| s.visibility().unwrap_or(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_overlap_is_strict() {
        let a = Sprite::new(SpriteId(1), "a", Vec2::ZERO, Vec2::splat(10.0));
        let touching = Sprite::new(SpriteId(2), "b", Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let inside = Sprite::new(SpriteId(3), "c", Vec2::new(9.0, 9.0), Vec2::splat(10.0));

        assert!(!a.aabb().overlaps(&touching.aabb()));
        assert!(a.aabb().overlaps(&inside.aabb()));
    }

    #[test]
    fn test_instantiate_is_independent() {
        let preset = Sprite::new(SpriteId(100), "coin", Vec2::ZERO, Vec2::splat(8.0))
            .with_characteristic(Characteristic::Rotatable { speed: 1.0 })
            .with_state(SpriteState::visible(5.0))
            .as_preset();

        let mut instance = preset.instantiate(SpriteId(1), Vec2::new(40.0, 50.0));
        assert_eq!(instance.role, SpriteRole::Instance);
        assert_eq!(instance.pos, Vec2::new(40.0, 50.0));

        if let Characteristic::Rotatable { speed } = &mut instance.characteristics[0] {
            *speed = 9.0;
        }
        instance.states[0].update_state(10.0);

        assert_eq!(preset.characteristics[0], Characteristic::Rotatable { speed: 1.0 });
        assert!(preset.is_visible());
        assert!(!instance.is_visible());
    }
}
