//! Simulation tick
//!
//! One call advances the world by `dt` in a fixed order:
//! 1. Move every sprite by its velocity
//! 2. Detect collisions for every sprite against the moved snapshot
//! 3. Dispatch characteristics (sprite order, then authoring order)
//! 4. Update states with the pain taken this tick
//! 5. Commit staged removals and spawns
//! 6. Advance the tick counter
//!
//! A failing characteristic is logged and skipped; the tick always completes.

use super::characteristic::Dispatch;
use super::collision::detect_all;
use super::world::World;

/// Summary of one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Tick number that just completed (1-based)
    pub tick: u64,
    /// Sprites whose collision map was non-empty
    pub colliding: usize,
    /// Characteristics that failed and were skipped
    pub skipped: usize,
    pub removed: usize,
    pub spawned: usize,
    /// Events recorded during this tick
    pub events: usize,
}

/// Sanitise a host-supplied step length. Negative, NaN or infinite becomes 0.
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        log::warn!("Invalid tick duration {}, using 0", dt);
        0.0
    }
}

/// Advance the world by one step of `dt` seconds
pub fn tick(world: &mut World, dt: f32) -> TickReport {
    let dt = sanitize_dt(dt);
    let events_before = world.events().len();

    // --- MOVE ---
    for sprite in world.sprites_mut() {
        sprite.pos += sprite.vel * dt;
    }

    // --- DETECT ---
    // Maps are computed up front so dispatch never sees a half-updated world
    let maps = detect_all(world.sprites());
    let colliding = maps.iter().filter(|m| !m.is_empty()).count();

    // --- DISPATCH ---
    // The list isn't resized before commit, so indices stay valid
    let mut skipped = 0;
    for (index, map) in maps.iter().enumerate() {
        let owner = world.sprites()[index].id;
        let mut characteristics = std::mem::take(&mut world.sprites_mut()[index].characteristics);

        for characteristic in characteristics.iter_mut() {
            let mut ctx = Dispatch {
                world: &mut *world,
                owner,
                dt,
            };
            if let Err(e) = characteristic.execute(&mut ctx, map) {
                log::warn!("Skipping {:?} on sprite {:?}: {}", characteristic, owner, e);
                skipped += 1;
            }
        }

        world.sprites_mut()[index].characteristics = characteristics;
    }

    // --- UPDATE ---
    for sprite in world.sprites_mut() {
        let pain = std::mem::take(&mut sprite.pain);
        for state in sprite.states.iter_mut() {
            state.update_state(pain);
        }
    }

    // --- COMMIT ---
    let summary = world.commit();
    if summary.removed > 0 || summary.spawned > 0 {
        log::debug!(
            "Tick {}: removed {}, spawned {}, {} active",
            world.tick_count + 1,
            summary.removed,
            summary.spawned,
            world.sprites().len()
        );
    }

    world.tick_count += 1;
    world.elapsed += dt as f64;

    TickReport {
        tick: world.tick_count,
        colliding,
        skipped,
        removed: summary.removed,
        spawned: summary.spawned,
        events: world.events().len().saturating_sub(events_before),
    }
}
