//! One-shot effects produced by characteristics
//!
//! `act` takes the action by value, so an action can only ever be applied
//! once. Actions touch sprites and world bookkeeping directly but never add
//! or remove sprites themselves; that goes through the world's staging.

use glam::Vec2;

use super::collision::Side;
use super::sprite::SpriteId;
use super::world::{GameEvent, GameStatus, World};
use crate::error::SimError;
use crate::normalize_angle;

/// An effect on the world
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Stop or bounce `target`'s velocity component pointing into the face `side`
    Hit {
        target: SpriteId,
        side: Side,
        /// 0 stops, 1 reflects with full speed
        restitution: f32,
    },
    /// Stage `target` for removal
    Break { target: SpriteId },
    /// Credit `amount` to `sprite` and to the level score
    ScoreAdder { amount: f64, sprite: SpriteId },
    /// Mark the level as won by `sprite`
    WinLevel { sprite: SpriteId },
    /// Turn `target` by `radians`
    Rotate { target: SpriteId, radians: f32 },
    /// Add pain to `target` for its states to consume
    Hurt { target: SpriteId, amount: f64 },
    /// Scale `target`'s velocity
    Boost { target: SpriteId, factor: f32 },
    /// Stage a clone of a preset at `at`
    Spawn { preset: String, at: Vec2 },
}

impl Action {
    /// Apply this action to the world
    pub fn act(self, world: &mut World) -> Result<(), SimError> {
        match self {
            Action::Hit {
                target,
                side,
                restitution,
            } => {
                let sprite = world.target_mut(target)?;
                let restitution = restitution.clamp(0.0, 1.0);
                // Only a velocity heading into the face gets redirected
                match side {
                    Side::Left if sprite.vel.x > 0.0 => sprite.vel.x *= -restitution,
                    Side::Right if sprite.vel.x < 0.0 => sprite.vel.x *= -restitution,
                    Side::Top if sprite.vel.y > 0.0 => sprite.vel.y *= -restitution,
                    Side::Bottom if sprite.vel.y < 0.0 => sprite.vel.y *= -restitution,
                    _ => {}
                }
                world.push_event(GameEvent::Hit { target, side });
            }

            Action::Break { target } => {
                if !world.contains(target) {
                    return Err(SimError::MissingSprite(target));
                }
                world.stage_removal(target);
                world.push_event(GameEvent::BreakStaged { target });
            }

            Action::ScoreAdder { amount, sprite } => {
                let amount = if amount.is_finite() && amount > 0.0 {
                    amount
                } else {
                    if amount != 0.0 {
                        log::warn!("Clamping score delta {} for {:?} to 0", amount, sprite);
                    }
                    0.0
                };
                world.target_mut(sprite)?.score += amount;
                world.score += amount;
                world.push_event(GameEvent::ScoreAdded { sprite, amount });
            }

            Action::WinLevel { sprite } => {
                if !world.contains(sprite) {
                    return Err(SimError::MissingSprite(sprite));
                }
                if world.status == GameStatus::Playing {
                    log::info!("Level won by {:?} at tick {}", sprite, world.tick_count);
                    world.status = GameStatus::Won;
                }
                world.push_event(GameEvent::LevelWon { by: sprite });
            }

            Action::Rotate { target, radians } => {
                if !radians.is_finite() {
                    return Err(SimError::InvalidParameter("rotation must be finite"));
                }
                let sprite = world.target_mut(target)?;
                sprite.rotation = normalize_angle(sprite.rotation + radians);
                world.push_event(GameEvent::Rotated { target, radians });
            }

            Action::Hurt { target, amount } => {
                let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
                world.target_mut(target)?.pain += amount;
                world.push_event(GameEvent::Hurt { target, amount });
            }

            Action::Boost { target, factor } => {
                if !factor.is_finite() || factor <= 0.0 {
                    return Err(SimError::InvalidParameter("boost factor must be positive"));
                }
                world.target_mut(target)?.vel *= factor;
                world.push_event(GameEvent::Boosted { target, factor });
            }

            Action::Spawn { preset, at } => {
                let id = world.stage_spawn(&preset, at)?;
                world.push_event(GameEvent::SpawnStaged { id, preset });
            }
        }

        Ok(())
    }

    /// Sprite this action is aimed at, if any
    pub fn target(&self) -> Option<SpriteId> {
        match self {
            Action::Hit { target, .. }
            | Action::Break { target }
            | Action::Rotate { target, .. }
            | Action::Hurt { target, .. }
            | Action::Boost { target, .. } => Some(*target),
            Action::ScoreAdder { sprite, .. } | Action::WinLevel { sprite } => Some(*sprite),
            Action::Spawn { .. } => None,
        }
    }
}
