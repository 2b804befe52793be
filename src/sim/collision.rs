//! Collision detection between axis-aligned sprite boxes
//!
//! For a probed sprite, every other overlapping sprite is reported together
//! with the face of the probe it touches. The face is the one with the least
//! penetration; exact ties go to the vertical faces first (Top, Bottom, Left,
//! Right), so results never depend on float noise in iteration order.

use serde::{Deserialize, Serialize};

use super::sprite::{Aabb, Sprite, SpriteId};

/// Face of the probed sprite where contact happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Tie-break order, earlier wins
    pub const PRIORITY: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }
}

/// One entry of a collision map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// The sprite overlapping the probe
    pub other: SpriteId,
    /// Face of the probe it overlaps
    pub side: Side,
    /// Penetration depth along that face's normal
    pub depth: f32,
}

/// Contacts of one probed sprite for one tick, in active-list order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionMap {
    contacts: Vec<Contact>,
}

impl CollisionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.iter()
    }

    /// Side on which `other` touches the probe, if it does
    pub fn side_of(&self, other: SpriteId) -> Option<Side> {
        self.contacts.iter().find(|c| c.other == other).map(|c| c.side)
    }
}

/// Penetration of `other` into `probe` through each face, in `Side::PRIORITY` order.
/// Y grows downward, so the top face is `min.y`.
fn face_penetrations(probe: &Aabb, other: &Aabb) -> [f32; 4] {
    [
        other.bottom() - probe.top(),
        probe.bottom() - other.top(),
        other.right() - probe.left(),
        probe.right() - other.left(),
    ]
}

/// Contact side and depth for two boxes, `None` if they don't overlap
pub fn contact_side(probe: &Aabb, other: &Aabb) -> Option<(Side, f32)> {
    if !probe.overlaps(other) {
        return None;
    }

    let depths = face_penetrations(probe, other);
    let mut best = 0;
    for i in 1..depths.len() {
        // Strictly less: ties keep the earlier (higher priority) face
        if depths[i] < depths[best] {
            best = i;
        }
    }
    Some((Side::PRIORITY[best], depths[best]))
}

/// Compute the collision map of `sprites[probe]` against every other sprite.
///
/// O(n) per probe. Panics if `probe` is out of bounds.
pub fn detect_collisions(sprites: &[Sprite], probe: usize) -> CollisionMap {
    let probe_box = sprites[probe].aabb();
    let mut map = CollisionMap::new();

    for (i, other) in sprites.iter().enumerate() {
        if i == probe {
            continue;
        }
        if let Some((side, depth)) = contact_side(&probe_box, &other.aabb()) {
            map.push(Contact {
                other: other.id,
                side,
                depth,
            });
        }
    }

    map
}

/// Collision maps for every sprite, indexed like `sprites`
pub fn detect_all(sprites: &[Sprite]) -> Vec<CollisionMap> {
    (0..sprites.len())
        .map(|i| detect_collisions(sprites, i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn boxed(id: u32, x: f32, y: f32, w: f32, h: f32) -> Sprite {
        Sprite::new(SpriteId(id), "box", Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_horizontal_overlap_reports_left() {
        // B approaches A from the left and sinks 2px into it, rows aligned
        let sprites = vec![boxed(1, 0.0, 0.0, 10.0, 10.0), boxed(2, -8.0, 0.0, 10.0, 10.0)];

        let map = detect_collisions(&sprites, 0);
        assert_eq!(map.len(), 1);
        let contact = map.iter().next().unwrap();
        assert_eq!(contact.other, SpriteId(2));
        assert_eq!(contact.side, Side::Left);
        assert!((contact.depth - 2.0).abs() < 1e-5);

        // Seen from B, A is on its right face
        let map = detect_collisions(&sprites, 1);
        assert_eq!(map.side_of(SpriteId(1)), Some(Side::Right));
    }

    #[test]
    fn test_vertical_overlap_reports_top() {
        // Player standing slightly inside a platform's top face
        let sprites = vec![boxed(1, 0.0, 50.0, 100.0, 20.0), boxed(2, 40.0, 31.0, 10.0, 20.0)];

        let map = detect_collisions(&sprites, 0);
        assert_eq!(map.side_of(SpriteId(2)), Some(Side::Top));
    }

    #[test]
    fn test_exact_tie_prefers_vertical() {
        // Corner overlap of 2x2: every candidate face has equal depth
        let sprites = vec![boxed(1, 0.0, 0.0, 10.0, 10.0), boxed(2, 8.0, 8.0, 10.0, 10.0)];

        let map = detect_collisions(&sprites, 0);
        assert_eq!(map.side_of(SpriteId(2)), Some(Side::Bottom));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let sprites = vec![boxed(1, 0.0, 0.0, 10.0, 10.0), boxed(2, 10.0, 0.0, 10.0, 10.0)];
        assert!(detect_collisions(&sprites, 0).is_empty());
    }

    #[test]
    fn test_probe_excludes_itself_and_keeps_list_order() {
        let sprites = vec![
            boxed(7, 5.0, 5.0, 4.0, 4.0),
            boxed(1, 0.0, 0.0, 20.0, 20.0),
            boxed(3, 6.0, 6.0, 2.0, 2.0),
        ];

        let map = detect_collisions(&sprites, 1);
        let ids: Vec<_> = map.iter().map(|c| c.other).collect();
        assert_eq!(ids, vec![SpriteId(7), SpriteId(3)]);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn overlap_is_symmetric_and_sides_are_opposite(
                ax in -50.0f32..50.0, ay in -50.0f32..50.0,
                bx in -50.0f32..50.0, by in -50.0f32..50.0,
                w in 1.0f32..30.0, h in 1.0f32..30.0,
            ) {
                let a = boxed(1, ax, ay, w, h).aabb();
                let b = boxed(2, bx, by, w, h).aabb();

                let ab = contact_side(&a, &b);
                let ba = contact_side(&b, &a);
                prop_assert_eq!(ab.is_some(), ba.is_some());

                if let (Some((s1, d1)), Some((s2, d2))) = (ab, ba) {
                    // Same-sized boxes: both views agree on the axis and depth
                    prop_assert_eq!(s1.is_vertical(), s2.is_vertical());
                    prop_assert!((d1 - d2).abs() < 1e-3);
                    prop_assert!(d1 > 0.0);
                }
            }
        }
    }
}
