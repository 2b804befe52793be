//! Mutable world shared by every phase of a tick
//!
//! The active sprite list only changes in `commit`. Everything that wants to
//! add or remove a sprite during a tick goes through the staging buffers.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Side;
use super::sprite::{Sprite, SpriteId};
use crate::consts::MAX_PENDING_EVENTS;
use crate::error::SimError;

/// Outcome of the running level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// Level in progress
    #[default]
    Playing,
    /// A player sprite reached something winnable
    Won,
    /// The player sprite was removed
    Lost,
}

/// Something that happened during a tick, for HUD/menu/audio collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Hit { target: SpriteId, side: Side },
    BreakStaged { target: SpriteId },
    ScoreAdded { sprite: SpriteId, amount: f64 },
    LevelWon { by: SpriteId },
    Rotated { target: SpriteId, radians: f32 },
    Hurt { target: SpriteId, amount: f64 },
    Boosted { target: SpriteId, factor: f32 },
    SpawnStaged { id: SpriteId, preset: String },
    Removed { id: SpriteId },
    PlayerLost { id: SpriteId },
}

/// What `commit` changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub removed: usize,
    pub spawned: usize,
}

/// Active level state
#[derive(Debug)]
pub struct World {
    /// Active instances, in dispatch order
    sprites: Vec<Sprite>,
    /// Preset catalog available for spawning
    presets: Vec<Sprite>,
    /// Running score of the level
    pub score: f64,
    pub status: GameStatus,
    /// Completed ticks
    pub tick_count: u64,
    /// Simulated seconds
    pub elapsed: f64,
    pending_removals: BTreeSet<SpriteId>,
    pending_spawns: Vec<Sprite>,
    events: Vec<GameEvent>,
    rng: Pcg32,
    next_id: u32,
}

impl World {
    pub fn new(seed: u64) -> Self {
        Self {
            sprites: Vec::new(),
            presets: Vec::new(),
            score: 0.0,
            status: GameStatus::Playing,
            tick_count: 0,
            elapsed: 0.0,
            pending_removals: BTreeSet::new(),
            pending_spawns: Vec::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new sprite ID
    pub fn next_sprite_id(&mut self) -> SpriteId {
        let id = SpriteId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Register a preset in the catalog. Its id is reassigned from this world.
    pub fn add_preset(&mut self, preset: Sprite) -> SpriteId {
        let id = self.next_sprite_id();
        self.presets.push(Sprite { id, ..preset.as_preset() });
        id
    }

    pub fn presets(&self) -> &[Sprite] {
        &self.presets
    }

    pub fn preset(&self, name: &str) -> Option<&Sprite> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Insert a sprite directly into the active list.
    ///
    /// Only for setup between ticks (level load, editor drops). A sprite whose
    /// id is already taken gets a fresh one.
    pub fn insert(&mut self, mut sprite: Sprite) -> SpriteId {
        if sprite.id.0 >= self.next_id {
            self.next_id = sprite.id.0 + 1;
        } else if self.contains(sprite.id) || self.presets.iter().any(|p| p.id == sprite.id) {
            sprite.id = self.next_sprite_id();
        }
        let id = sprite.id;
        self.sprites.push(sprite);
        id
    }

    /// Clone a preset into the active list right away (between ticks only)
    pub fn place_preset(&mut self, name: &str, at: Vec2) -> Result<SpriteId, SimError> {
        let instance = self.instantiate_preset(name, at)?;
        let id = instance.id;
        self.sprites.push(instance);
        Ok(id)
    }

    fn instantiate_preset(&mut self, name: &str, at: Vec2) -> Result<Sprite, SimError> {
        let id = SpriteId(self.next_id);
        let template = self
            .presets
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| SimError::UnknownPreset(name.to_string()))?;
        let instance = template.instantiate(id, at);
        self.next_id += 1;
        Ok(instance)
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub(crate) fn sprites_mut(&mut self) -> &mut [Sprite] {
        &mut self.sprites
    }

    pub fn contains(&self, id: SpriteId) -> bool {
        self.sprites.iter().any(|s| s.id == id)
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.id == id)
    }

    pub fn sprite_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites.iter_mut().find(|s| s.id == id)
    }

    /// Sprite lookup that reports a missing target as a unit error
    pub(crate) fn target_mut(&mut self, id: SpriteId) -> Result<&mut Sprite, SimError> {
        self.sprite_mut(id).ok_or(SimError::MissingSprite(id))
    }

    /// The player-controlled sprite, if one is active
    pub fn player(&self) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.player)
    }

    pub fn player_mut(&mut self) -> Option<&mut Sprite> {
        self.sprites.iter_mut().find(|s| s.player)
    }

    /// Stage a sprite for removal at the next commit
    pub fn stage_removal(&mut self, id: SpriteId) {
        self.pending_removals.insert(id);
    }

    /// Whether a removal is already staged for `id`
    pub fn is_removal_staged(&self, id: SpriteId) -> bool {
        self.pending_removals.contains(&id)
    }

    /// Stage a clone of the named preset for insertion at the next commit
    pub fn stage_spawn(&mut self, preset: &str, at: Vec2) -> Result<SpriteId, SimError> {
        let instance = self.instantiate_preset(preset, at)?;
        let id = instance.id;
        self.pending_spawns.push(instance);
        Ok(id)
    }

    pub fn pending_spawn_count(&self) -> usize {
        self.pending_spawns.len()
    }

    /// Uniform sample in [-extent, extent] from the world's seeded RNG
    pub(crate) fn jitter(&mut self, extent: f32) -> f32 {
        use rand::Rng;

        if extent > 0.0 && extent.is_finite() {
            self.rng.random_range(-extent..=extent)
        } else {
            0.0
        }
    }

    /// Record an event for the host. Hosts are expected to drain every frame;
    /// past `MAX_PENDING_EVENTS` the oldest half is discarded.
    pub fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            let dropped = self.events.len() / 2;
            self.events.drain(..dropped);
            log::debug!("Event buffer full, dropped {} undrained events", dropped);
        }
        self.events.push(event);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply staged removals (plus sprites whose states are spent) and staged
    /// spawns to the active list in one go.
    pub fn commit(&mut self) -> CommitSummary {
        let mut removals = std::mem::take(&mut self.pending_removals);
        removals.extend(self.sprites.iter().filter(|s| s.is_spent()).map(|s| s.id));

        let before = self.sprites.len();
        let mut lost_player = None;
        let mut removed_ids = Vec::new();
        self.sprites.retain(|s| {
            if removals.contains(&s.id) {
                if s.player {
                    lost_player = Some(s.id);
                }
                removed_ids.push(s.id);
                false
            } else {
                true
            }
        });
        let removed = before - self.sprites.len();
        for id in removed_ids {
            self.push_event(GameEvent::Removed { id });
        }

        if let Some(id) = lost_player {
            if self.status == GameStatus::Playing && self.player().is_none() {
                log::info!("Player sprite {:?} removed, level lost", id);
                self.status = GameStatus::Lost;
                self.push_event(GameEvent::PlayerLost { id });
            }
        }

        let spawns = std::mem::take(&mut self.pending_spawns);
        let spawned = spawns.len();
        self.sprites.extend(spawns);

        CommitSummary { removed, spawned }
    }
}
