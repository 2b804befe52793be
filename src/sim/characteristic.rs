//! Characteristics: reusable behavior units attached to sprites
//!
//! Every characteristic of every active sprite is executed exactly once per
//! tick with the collision map of its owner. Collision-driven variants return
//! early on an empty map; time-driven variants ignore it.
//!
//! Characteristics don't hold a reference to their owner. The owner comes in
//! through [`Dispatch`], so a copied characteristic attached to a cloned
//! sprite always acts on the clone.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::action::Action;
use super::collision::CollisionMap;
use super::sprite::SpriteId;
use super::world::World;
use crate::error::SimError;

/// Pickup effects of the power-up family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect")]
pub enum PowerUp {
    /// Multiply the player's velocity
    SpeedBoost { factor: f32 },
    /// Flat score bonus for the player
    ScoreBonus { points: f64 },
}

impl PowerUp {
    fn effect(&self, player: SpriteId) -> Action {
        match self {
            PowerUp::SpeedBoost { factor } => Action::Boost {
                target: player,
                factor: *factor,
            },
            PowerUp::ScoreBonus { points } => Action::ScoreAdder {
                amount: *points,
                sprite: player,
            },
        }
    }
}

/// A behavior unit owned by one sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Characteristic {
    /// Solid: stops (or bounces) anything that runs into it
    Impassable {
        #[serde(default)]
        restitution: f32,
    },
    /// Spins at a constant rate
    Rotatable { speed: f32 },
    /// Earns score for its owner as time passes
    ScoreBasedOnTime { score_per_second: f64 },
    /// Touching it with the player wins the level
    Winnable,
    /// Consumed by the player for an effect
    PowerUp(PowerUp),
    /// Hurts everything touching it
    Damaging { damage: f64 },
    /// Periodically spawns a preset next to its owner
    Spawner {
        preset: String,
        interval: f32,
        #[serde(default)]
        jitter: f32,
        #[serde(default)]
        elapsed: f32,
    },
}

/// What a characteristic sees while it executes
pub struct Dispatch<'a> {
    pub world: &'a mut World,
    /// Sprite the characteristic belongs to
    pub owner: SpriteId,
    /// Length of the current tick (seconds)
    pub dt: f32,
}

impl Dispatch<'_> {
    /// Apply an action right away
    fn act(&mut self, action: Action) -> Result<(), SimError> {
        action.act(self.world)
    }

    fn is_player(&self, id: SpriteId) -> bool {
        self.world.sprite(id).is_some_and(|s| s.player)
    }
}

impl Characteristic {
    /// Run this characteristic for one tick
    pub fn execute(&mut self, ctx: &mut Dispatch<'_>, collisions: &CollisionMap) -> Result<(), SimError> {
        match self {
            Characteristic::Impassable { restitution } => {
                if collisions.is_empty() {
                    return Ok(());
                }
                for contact in collisions.iter() {
                    ctx.act(Action::Hit {
                        target: contact.other,
                        side: contact.side,
                        restitution: *restitution,
                    })?;
                }
            }

            Characteristic::Rotatable { speed } => {
                ctx.act(Action::Rotate {
                    target: ctx.owner,
                    radians: *speed * ctx.dt,
                })?;
            }

            Characteristic::ScoreBasedOnTime { score_per_second } => {
                ctx.act(Action::ScoreAdder {
                    amount: *score_per_second * ctx.dt as f64,
                    sprite: ctx.owner,
                })?;
            }

            Characteristic::Winnable => {
                if collisions.is_empty() {
                    return Ok(());
                }
                for contact in collisions.iter() {
                    if ctx.is_player(contact.other) {
                        ctx.act(Action::WinLevel { sprite: contact.other })?;
                    }
                }
            }

            Characteristic::PowerUp(kind) => {
                if collisions.is_empty() {
                    return Ok(());
                }
                let players: Vec<SpriteId> = collisions
                    .iter()
                    .map(|c| c.other)
                    .filter(|id| ctx.is_player(*id))
                    .collect();
                if players.is_empty() {
                    return Ok(());
                }
                // Consumed even if an effect fails
                let mut result = Ok(());
                for player in players {
                    if let Err(e) = ctx.act(kind.effect(player)) {
                        result = result.and(Err(e));
                    }
                }
                ctx.act(Action::Break { target: ctx.owner })?;
                return result;
            }

            Characteristic::Damaging { damage } => {
                if collisions.is_empty() {
                    return Ok(());
                }
                for contact in collisions.iter() {
                    ctx.act(Action::Hurt {
                        target: contact.other,
                        amount: *damage,
                    })?;
                }
            }

            Characteristic::Spawner {
                preset,
                interval,
                jitter,
                elapsed,
            } => {
                if !interval.is_finite() || *interval <= 0.0 {
                    return Err(SimError::InvalidParameter("spawn interval must be positive"));
                }
                *elapsed += ctx.dt;
                if *elapsed < *interval {
                    return Ok(());
                }

                let origin = ctx
                    .world
                    .sprite(ctx.owner)
                    .map(|s| s.pos)
                    .ok_or(SimError::MissingSprite(ctx.owner))?;
                // One spawn per interval crossed, however long the tick
                while *elapsed >= *interval {
                    *elapsed -= *interval;
                    let at = origin + Vec2::new(ctx.world.jitter(*jitter), 0.0);
                    ctx.act(Action::Spawn {
                        preset: preset.clone(),
                        at,
                    })?;
                }
            }
        }

        Ok(())
    }

    /// Independent copy for a cloned sprite.
    ///
    /// Authored parameters are kept; per-instance progress (a spawner's
    /// elapsed timer) starts over.
    pub fn copy(&self) -> Characteristic {
        match self {
            Characteristic::Spawner {
                preset,
                interval,
                jitter,
                ..
            } => Characteristic::Spawner {
                preset: preset.clone(),
                interval: *interval,
                jitter: *jitter,
                elapsed: 0.0,
            },
            other => other.clone(),
        }
    }

    /// Whether this characteristic only reacts to collisions
    pub fn is_collision_driven(&self) -> bool {
        matches!(
            self,
            Characteristic::Impassable { .. }
                | Characteristic::Winnable
                | Characteristic::PowerUp(_)
                | Characteristic::Damaging { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::{Contact, Side};
    use crate::sim::world::GameEvent;
    use crate::sim::Sprite;

    fn contact(other: SpriteId, side: Side) -> Contact {
        Contact {
            other,
            side,
            depth: 1.0,
        }
    }

    fn setup() -> (World, SpriteId, SpriteId, SpriteId) {
        let mut world = World::new(3);
        world.add_preset(Sprite::new(SpriteId(0), "spark", Vec2::ZERO, Vec2::ONE));
        let owner = world.insert(Sprite::new(SpriteId(10), "goal", Vec2::new(50.0, 0.0), Vec2::splat(10.0)));
        let hero = world.insert(
            Sprite::new(SpriteId(11), "hero", Vec2::new(45.0, 0.0), Vec2::splat(10.0))
                .with_vel(Vec2::new(20.0, 0.0))
                .as_player(),
        );
        let rock = world.insert(Sprite::new(SpriteId(12), "rock", Vec2::new(55.0, 0.0), Vec2::splat(10.0)));
        (world, owner, hero, rock)
    }

    fn run(c: &mut Characteristic, world: &mut World, owner: SpriteId, map: &CollisionMap, dt: f32) -> Result<(), SimError> {
        let mut ctx = Dispatch { world, owner, dt };
        c.execute(&mut ctx, map)
    }

    #[test]
    fn test_collision_driven_do_nothing_on_empty_map() {
        let (mut world, owner, ..) = setup();
        let empty = CollisionMap::new();
        for mut c in [
            Characteristic::Impassable { restitution: 0.0 },
            Characteristic::Winnable,
            Characteristic::PowerUp(PowerUp::ScoreBonus { points: 5.0 }),
            Characteristic::Damaging { damage: 3.0 },
        ] {
            assert!(c.is_collision_driven());
            run(&mut c, &mut world, owner, &empty, 0.1).unwrap();
        }
        assert!(world.events().is_empty());
    }

    #[test]
    fn test_impassable_hits_each_contact_once() {
        let (mut world, owner, hero, rock) = setup();
        let mut map = CollisionMap::new();
        map.push(contact(hero, Side::Left));
        map.push(contact(rock, Side::Right));

        let mut c = Characteristic::Impassable { restitution: 0.0 };
        run(&mut c, &mut world, owner, &map, 0.1).unwrap();

        let hits: Vec<_> = world
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Hit { .. }))
            .collect();
        assert_eq!(hits.len(), 2);
        assert_eq!(world.sprite(hero).unwrap().vel.x, 0.0);
    }

    #[test]
    fn test_winnable_only_reacts_to_players() {
        let (mut world, owner, hero, rock) = setup();
        let mut map = CollisionMap::new();
        map.push(contact(rock, Side::Right));

        let mut c = Characteristic::Winnable;
        run(&mut c, &mut world, owner, &map, 0.1).unwrap();
        assert!(world.events().is_empty());

        map.push(contact(hero, Side::Left));
        run(&mut c, &mut world, owner, &map, 0.1).unwrap();
        assert_eq!(world.events(), &[GameEvent::LevelWon { by: hero }]);
    }

    #[test]
    fn test_score_based_on_time_uses_dt() {
        let (mut world, owner, ..) = setup();
        let mut c = Characteristic::ScoreBasedOnTime { score_per_second: 10.0 };
        run(&mut c, &mut world, owner, &CollisionMap::new(), 0.5).unwrap();
        assert!((world.score - 5.0).abs() < 1e-9);
        assert!((world.sprite(owner).unwrap().score - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotatable_turns_owner() {
        let (mut world, owner, ..) = setup();
        let mut c = Characteristic::Rotatable { speed: 2.0 };
        run(&mut c, &mut world, owner, &CollisionMap::new(), 0.25).unwrap();
        assert!((world.sprite(owner).unwrap().rotation - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_power_up_applies_and_breaks_itself() {
        let (mut world, owner, hero, _) = setup();
        let mut map = CollisionMap::new();
        map.push(contact(hero, Side::Left));

        let mut c = Characteristic::PowerUp(PowerUp::SpeedBoost { factor: 2.0 });
        run(&mut c, &mut world, owner, &map, 0.1).unwrap();

        assert_eq!(world.sprite(hero).unwrap().vel, Vec2::new(40.0, 0.0));
        assert!(world.is_removal_staged(owner));
        assert!(world.contains(owner));
    }

    #[test]
    fn test_damaging_hurts_contacts() {
        let (mut world, owner, hero, rock) = setup();
        let mut map = CollisionMap::new();
        map.push(contact(hero, Side::Left));
        map.push(contact(rock, Side::Right));

        let mut c = Characteristic::Damaging { damage: 4.0 };
        run(&mut c, &mut world, owner, &map, 0.1).unwrap();
        assert_eq!(world.sprite(hero).unwrap().pain, 4.0);
        assert_eq!(world.sprite(rock).unwrap().pain, 4.0);
    }

    #[test]
    fn test_spawner_fires_on_interval() {
        let (mut world, owner, ..) = setup();
        let mut c = Characteristic::Spawner {
            preset: "spark".into(),
            interval: 1.0,
            jitter: 0.0,
            elapsed: 0.0,
        };
        let empty = CollisionMap::new();
        run(&mut c, &mut world, owner, &empty, 0.6).unwrap();
        assert_eq!(world.pending_spawn_count(), 0);
        run(&mut c, &mut world, owner, &empty, 0.6).unwrap();
        assert_eq!(world.pending_spawn_count(), 1);
    }

    #[test]
    fn test_spawner_catches_up_on_long_ticks() {
        let (mut world, owner, ..) = setup();
        let mut c = Characteristic::Spawner {
            preset: "spark".into(),
            interval: 0.125,
            jitter: 0.0,
            elapsed: 0.0,
        };
        let empty = CollisionMap::new();

        run(&mut c, &mut world, owner, &empty, 1.0).unwrap();
        assert_eq!(world.pending_spawn_count(), 8);

        // No backlog left over: short ticks stay quiet until the next interval
        for _ in 0..5 {
            run(&mut c, &mut world, owner, &empty, 0.0078125).unwrap();
        }
        assert_eq!(world.pending_spawn_count(), 8);
        match &c {
            Characteristic::Spawner { elapsed, .. } => assert_eq!(*elapsed, 0.0390625),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_power_up_breaks_even_when_effect_fails() {
        let (mut world, owner, hero, _) = setup();
        let mut map = CollisionMap::new();
        map.push(contact(hero, Side::Left));

        let mut c = Characteristic::PowerUp(PowerUp::SpeedBoost { factor: 0.0 });
        assert!(matches!(
            run(&mut c, &mut world, owner, &map, 0.1),
            Err(SimError::InvalidParameter(_))
        ));
        assert!(world.is_removal_staged(owner));
        assert_eq!(world.sprite(hero).unwrap().vel, Vec2::new(20.0, 0.0));
    }

    #[test]
    fn test_spawner_reports_bad_input() {
        let (mut world, owner, ..) = setup();
        let empty = CollisionMap::new();

        let mut unknown = Characteristic::Spawner {
            preset: "nope".into(),
            interval: 0.1,
            jitter: 0.0,
            elapsed: 0.0,
        };
        assert_eq!(
            run(&mut unknown, &mut world, owner, &empty, 0.2),
            Err(SimError::UnknownPreset("nope".into()))
        );

        let mut zero = Characteristic::Spawner {
            preset: "spark".into(),
            interval: 0.0,
            jitter: 0.0,
            elapsed: 0.0,
        };
        assert!(matches!(
            run(&mut zero, &mut world, owner, &empty, 0.2),
            Err(SimError::InvalidParameter(_))
        ));
        assert_eq!(world.pending_spawn_count(), 0);
    }

    #[test]
    fn test_copy_is_independent() {
        let all = [
            Characteristic::Impassable { restitution: 0.25 },
            Characteristic::Rotatable { speed: 1.0 },
            Characteristic::ScoreBasedOnTime { score_per_second: 3.0 },
            Characteristic::Winnable,
            Characteristic::PowerUp(PowerUp::ScoreBonus { points: 1.0 }),
            Characteristic::Damaging { damage: 2.0 },
            Characteristic::Spawner {
                preset: "spark".into(),
                interval: 2.0,
                jitter: 1.0,
                elapsed: 1.5,
            },
        ];

        for source in all {
            let snapshot = source.clone();
            let mut copy = source.copy();
            match &mut copy {
                Characteristic::Impassable { restitution } => *restitution = 1.0,
                Characteristic::Rotatable { speed } => *speed = -5.0,
                Characteristic::ScoreBasedOnTime { score_per_second } => *score_per_second = 0.0,
                Characteristic::PowerUp(PowerUp::ScoreBonus { points }) => *points = 99.0,
                Characteristic::Damaging { damage } => *damage = 0.0,
                Characteristic::Spawner { preset, elapsed, .. } => {
                    preset.push_str("-changed");
                    *elapsed = 0.9;
                }
                _ => {}
            }
            assert_eq!(source, snapshot);
        }
    }

    #[test]
    fn test_copy_resets_spawner_progress() {
        let source = Characteristic::Spawner {
            preset: "spark".into(),
            interval: 2.0,
            jitter: 0.0,
            elapsed: 1.5,
        };
        match source.copy() {
            Characteristic::Spawner { elapsed, interval, .. } => {
                assert_eq!(elapsed, 0.0);
                assert_eq!(interval, 2.0);
            }
            other => panic!("unexpected copy {:?}", other),
        }
    }
}
