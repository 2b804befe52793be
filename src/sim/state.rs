//! Sprite states
//!
//! A state is a facet of a sprite that evolves every tick from the pain the
//! sprite took during that tick, independently of collisions. A state that
//! reaches its terminal condition gets its sprite removed at commit.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_PAIN_THRESHOLD;

fn default_threshold() -> f64 {
    DEFAULT_PAIN_THRESHOLD
}

/// A continuously-updated facet of a sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SpriteState {
    /// Visible until the accumulated pain crosses `threshold`
    Visible {
        #[serde(default = "default_visible")]
        visible: bool,
        #[serde(default)]
        pain_taken: f64,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
    /// Hit points drained by pain
    Health { hp: f64, max: f64 },
}

fn default_visible() -> bool {
    true
}

impl SpriteState {
    /// A visible state with the given pain threshold
    pub fn visible(threshold: f64) -> Self {
        SpriteState::Visible {
            visible: true,
            pain_taken: 0.0,
            threshold,
        }
    }

    /// Full health
    pub fn health(max: f64) -> Self {
        SpriteState::Health { hp: max, max }
    }

    /// Advance this state with the pain taken this tick
    pub fn update_state(&mut self, intensity: f64) {
        // Negative or NaN pain never heals
        let pain = if intensity.is_finite() { intensity.max(0.0) } else { 0.0 };

        match self {
            SpriteState::Visible {
                visible,
                pain_taken,
                threshold,
            } => {
                if !*visible {
                    return;
                }
                *pain_taken += pain;
                if *pain_taken >= *threshold {
                    *visible = false;
                }
            }
            SpriteState::Health { hp, .. } => {
                *hp = (*hp - pain).max(0.0);
            }
        }
    }

    /// Independent copy for a cloned sprite.
    ///
    /// A `Visible` copy starts visible with no pain but keeps the threshold;
    /// `Health` is copied at full hit points.
    pub fn copy(&self) -> SpriteState {
        match self {
            SpriteState::Visible { threshold, .. } => SpriteState::visible(*threshold),
            SpriteState::Health { max, .. } => SpriteState::health(*max),
        }
    }

    /// Whether the owning sprite should be removed at commit
    pub fn is_terminal(&self) -> bool {
        match self {
            SpriteState::Visible { visible, .. } => !visible,
            SpriteState::Health { hp, .. } => *hp <= 0.0,
        }
    }

    /// Visibility flag, if this state carries one
    pub fn visibility(&self) -> Option<bool> {
        match self {
            SpriteState::Visible { visible, .. } => Some(*visible),
            _ => None,
        }
    }
}
