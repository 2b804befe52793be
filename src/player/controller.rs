//! Engine facade used by the host
//!
//! Owns the game model, the running level and the pending input. The host
//! drives it from its animation loop (`advance`) and reads back sprite views,
//! score and events for rendering and HUD updates.

use glam::Vec2;

use super::animation::AnimationLoop;
use super::input::{HeldKeys, InputEvent, InputQueue, MovementKey};
use crate::error::EngineError;
use crate::model::GameModel;
use crate::settings::EngineSettings;
use crate::sim::{GameEvent, GameStatus, Sprite, SpriteId, TickReport, World, tick};

/// Render snapshot of one sprite
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteView {
    pub id: SpriteId,
    pub name: String,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub image: String,
    pub visible: bool,
    pub rotation: f32,
}

impl From<&Sprite> for SpriteView {
    fn from(sprite: &Sprite) -> Self {
        Self {
            id: sprite.id,
            name: sprite.name.clone(),
            pos: sprite.pos,
            size: sprite.size,
            image: sprite.image.clone(),
            visible: sprite.is_visible(),
            rotation: sprite.rotation,
        }
    }
}

/// Runs a game model level by level
#[derive(Debug)]
pub struct PlayerController {
    model: GameModel,
    settings: EngineSettings,
    level_index: usize,
    world: World,
    /// Score banked by previously won levels
    carried_score: f64,
    input: InputQueue,
    held: HeldKeys,
}

impl PlayerController {
    /// Validate the model and settings, then load the first level
    pub fn new(model: GameModel, settings: EngineSettings) -> Result<Self, EngineError> {
        settings.validate()?;
        model.validate()?;
        let world = model.build_world(0, settings.seed)?;
        log::info!("Loaded game '{}' ({} levels)", model.name, model.levels.len());

        Ok(Self {
            model,
            settings,
            level_index: 0,
            world,
            carried_score: 0.0,
            input: InputQueue::new(),
            held: HeldKeys::default(),
        })
    }

    /// Animation loop configured from the engine settings
    pub fn animation_loop(&self) -> AnimationLoop {
        AnimationLoop::new(self.settings.tick_dt, self.settings.max_substeps)
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn sprites(&self) -> &[Sprite] {
        self.world.sprites()
    }

    pub fn presets(&self) -> &[Sprite] {
        self.world.presets()
    }

    pub fn background(&self) -> &str {
        self.model
            .level(self.level_index)
            .map(|level| level.background.as_str())
            .unwrap_or_default()
    }

    pub fn status(&self) -> GameStatus {
        self.world.status
    }

    /// Total score: banked levels plus the running one
    pub fn score(&self) -> f64 {
        self.carried_score + self.world.score
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level_count(&self) -> usize {
        self.model.levels.len()
    }

    pub fn tick_count(&self) -> u64 {
        self.world.tick_count
    }

    pub fn views(&self) -> Vec<SpriteView> {
        self.world.sprites().iter().map(SpriteView::from).collect()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.world.drain_events()
    }

    /// Queue a key press. Returns false for keys the engine ignores.
    pub fn key_pressed(&mut self, code: &str) -> bool {
        self.queue_key(code, InputEvent::Pressed)
    }

    /// Queue a key release. Returns false for keys the engine ignores.
    pub fn key_released(&mut self, code: &str) -> bool {
        self.queue_key(code, InputEvent::Released)
    }

    fn queue_key(&mut self, code: &str, event: fn(MovementKey) -> InputEvent) -> bool {
        match MovementKey::from_code(code) {
            Some(key) => {
                self.input.push(event(key));
                true
            }
            None => false,
        }
    }

    /// Apply queued input to the player, then run one tick of `dt` seconds.
    /// Nothing happens once the level is won or lost; `restart` or
    /// `next_level` resumes play.
    ///
    /// Events accumulate until `drain_events` is called, so hosts should
    /// drain once per frame.
    pub fn advance(&mut self, dt: f32) -> Option<TickReport> {
        if self.world.status != GameStatus::Playing {
            self.input.clear();
            return None;
        }

        self.apply_input();
        Some(tick(&mut self.world, dt))
    }

    /// Velocity changes on key transitions only, so a wall that stopped the
    /// player isn't pushed into again until the key is pressed anew.
    fn apply_input(&mut self) {
        let speed = self.settings.move_speed;
        for event in self.input.drain() {
            self.held.apply(event);
            let direction = self.held.direction();
            match self.world.player_mut() {
                Some(player) => {
                    if event.key().is_horizontal() {
                        player.vel.x = direction.x * speed;
                    } else {
                        player.vel.y = direction.y * speed;
                    }
                }
                None => log::debug!("Ignoring {:?}, level has no player", event),
            }
        }
    }

    /// Place a preset directly into the running level
    pub fn drop_preset(&mut self, name: &str, pos: Vec2) -> Option<SpriteId> {
        match self.world.place_preset(name, pos) {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("Cannot drop '{}': {}", name, e);
                None
            }
        }
    }

    /// Reload the current level from the model
    pub fn restart(&mut self) {
        self.load_level(self.level_index);
        log::info!("Restarted level {}", self.level_index);
    }

    /// Move on to the next level after a win. Returns false when the current
    /// level isn't won yet or there is no further level.
    pub fn next_level(&mut self) -> bool {
        if self.world.status != GameStatus::Won {
            return false;
        }
        let next = self.level_index + 1;
        if next >= self.model.levels.len() {
            log::info!("Game '{}' complete, final score {:.0}", self.model.name, self.score());
            return false;
        }

        self.carried_score += self.world.score;
        self.load_level(next);
        true
    }

    fn load_level(&mut self, index: usize) {
        let seed = self.settings.seed.wrapping_add(index as u64);
        // The model was validated on construction, so every level index builds
        match self.model.build_world(index, seed) {
            Ok(world) => {
                self.world = world;
                self.level_index = index;
                self.input.clear();
                self.held = HeldKeys::default();
            }
            Err(e) => log::error!("Failed to load level {}: {}", index, e),
        }
    }
}
