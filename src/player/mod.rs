//! Host-facing side of the engine
//!
//! - `controller`: facade that loads levels, takes input and runs ticks
//! - `animation`: fixed-step loop driven by display frame timestamps
//! - `input`: movement key filtering and queueing

pub mod animation;
pub mod controller;
pub mod input;

pub use animation::{AnimationLoop, StopHandle};
pub use controller::{PlayerController, SpriteView};
pub use input::{InputEvent, InputQueue, MovementKey};
