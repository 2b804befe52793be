//! Movement input
//!
//! The host captures raw key codes; only the movement subset is recognized
//! here. Events are queued and drained by the controller right before the
//! next tick, so velocity changes always land before the Move phase.

use glam::Vec2;

/// Keys the engine reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementKey {
    Left,
    Right,
    Up,
    Down,
}

impl MovementKey {
    /// Map a host key code to a movement key. Arrow keys and WASD, in either
    /// the short (`LEFT`, `A`) or DOM (`ArrowLeft`, `KeyA`) spelling.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "LEFT" | "ARROWLEFT" | "A" | "KEYA" => Some(MovementKey::Left),
            "RIGHT" | "ARROWRIGHT" | "D" | "KEYD" => Some(MovementKey::Right),
            "UP" | "ARROWUP" | "W" | "KEYW" => Some(MovementKey::Up),
            "DOWN" | "ARROWDOWN" | "S" | "KEYS" => Some(MovementKey::Down),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            MovementKey::Left => 1,
            MovementKey::Right => 2,
            MovementKey::Up => 4,
            MovementKey::Down => 8,
        }
    }

    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, MovementKey::Left | MovementKey::Right)
    }
}

/// A recognized key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(MovementKey),
    Released(MovementKey),
}

impl InputEvent {
    pub fn key(self) -> MovementKey {
        match self {
            InputEvent::Pressed(key) | InputEvent::Released(key) => key,
        }
    }
}

/// Pending input events, drained once per frame
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// Set of movement keys currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys(u8);

impl HeldKeys {
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pressed(key) => self.0 |= key.bit(),
            InputEvent::Released(key) => self.0 &= !key.bit(),
        }
    }

    pub fn is_held(self, key: MovementKey) -> bool {
        self.0 & key.bit() != 0
    }

    /// Unit-per-axis direction; opposite keys cancel out. Y grows downward.
    pub fn direction(self) -> Vec2 {
        let axis = |neg: MovementKey, pos: MovementKey| {
            (self.is_held(pos) as i8 - self.is_held(neg) as i8) as f32
        };
        Vec2::new(
            axis(MovementKey::Left, MovementKey::Right),
            axis(MovementKey::Up, MovementKey::Down),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_codes() {
        assert_eq!(MovementKey::from_code("LEFT"), Some(MovementKey::Left));
        assert_eq!(MovementKey::from_code("ArrowRight"), Some(MovementKey::Right));
        assert_eq!(MovementKey::from_code("w"), Some(MovementKey::Up));
        assert_eq!(MovementKey::from_code("KeyS"), Some(MovementKey::Down));
        assert_eq!(MovementKey::from_code("SPACE"), None);
        assert_eq!(MovementKey::from_code("ESCAPE"), None);
    }

    #[test]
    fn test_push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Pressed(MovementKey::Left));
        q.push(InputEvent::Released(MovementKey::Left));
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn test_held_direction() {
        let mut held = HeldKeys::default();
        held.apply(InputEvent::Pressed(MovementKey::Right));
        held.apply(InputEvent::Pressed(MovementKey::Up));
        assert_eq!(held.direction(), Vec2::new(1.0, -1.0));

        held.apply(InputEvent::Pressed(MovementKey::Left));
        assert_eq!(held.direction(), Vec2::new(0.0, -1.0));

        held.apply(InputEvent::Released(MovementKey::Right));
        held.apply(InputEvent::Released(MovementKey::Up));
        assert_eq!(held.direction(), Vec2::new(-1.0, 0.0));
    }
}
