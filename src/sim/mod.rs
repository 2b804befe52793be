//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Tick length comes from the caller
//! - Seeded RNG only
//! - Stable iteration order (active-list order, then authoring order)
//! - No rendering or platform dependencies

pub mod action;
pub mod characteristic;
pub mod collision;
pub mod sprite;
pub mod state;
pub mod tick;
pub mod world;

pub use action::Action;
pub use characteristic::{Characteristic, Dispatch, PowerUp};
pub use collision::{CollisionMap, Contact, Side, contact_side, detect_all, detect_collisions};
pub use sprite::{Aabb, Sprite, SpriteId, SpriteRole};
pub use state::SpriteState;
pub use tick::{TickReport, sanitize_dt, tick};
pub use world::{CommitSummary, GameEvent, GameStatus, World};
