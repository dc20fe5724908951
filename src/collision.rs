//! Contact detection and the collision dispatch table.
//!
//! Detection is a narrow AABB probe between the few entities that sense
//! contacts (the player avatar, despawn strips) and every categorised
//! actor. A [`ContactTracker`] remembers overlapping pairs so
//! [`ContactBegan`] fires exactly once per contact rather than once per
//! overlapping frame, and [`ContactEnded`] fires when the pair separates.
//!
//! Dispatch replaces the original tag-string table with the closed
//! [`Category`] enumeration: every category carries its [`Reaction`] as
//! data, so the mapping is exhaustive and checked at compile time.

use bevy_ecs::prelude::*;
use hashbrown::HashSet;
use rand::Rng;

use crate::clock::{TimerAction, TimerQueue, VirtualClock};
use crate::components::{Hitbox, Position, SensesContacts, SpriteScale, Struck};
use crate::constants::{stun_blink_interval, MIN_SPRITE_SCALE};
use crate::effects::{SceneId, SceneRequest, ShakeRequest, SoundId, SoundRequest};
use crate::player::Player;
use crate::score::Score;
use crate::spawn::SimRng;

/// Closed set of actor categories taking part in collision dispatch.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Runner-level obstacle scrolling leftward.
    Obstacle,
    /// Nourishing falling snack.
    Snack,
    /// Snack worth a point but no growth.
    BlandSnack,
    /// Spoiled item: stuns and costs points.
    Spoiled,
    /// Road vehicle on a traffic circuit.
    Car,
    /// Tram on rails.
    Tram,
    /// Cyclist weaving through the streets.
    Cyclist,
    /// Pedestrian on the pavements and quays.
    Pedestrian,
    /// The river ferry.
    Ferry,
    /// Canal water along the quays.
    Canal,
    /// Road surface damage; a harmless bump.
    Pothole,
    /// Off-screen strip that deletes whatever touches it.
    DespawnStrip,
}

/// Side effects a contact with a category triggers on the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reaction {
    /// Clips to choose one of at random; empty plays nothing.
    pub sounds: &'static [SoundId],
    /// Score change, clamped by [`Score`].
    pub score_delta: i32,
    /// Whether the player enters the stunned state.
    pub stun: bool,
    /// Whether to request a camera shake.
    pub shake: bool,
    /// Sprite scale change (negative shrinks).
    pub grow: f32,
    /// Whether the other actor is removed by the contact.
    pub despawn_other: bool,
    /// Scene to transition to, for win/lose contacts.
    pub scene: Option<SceneId>,
}

impl Reaction {
    /// A contact with no effect.
    pub const NONE: Self = Self {
        sounds: &[],
        score_delta: 0,
        stun: false,
        shake: false,
        grow: 0.0,
        despawn_other: false,
        scene: None,
    };
}

impl Category {
    /// The reaction this category triggers on contact with the player.
    #[must_use]
    pub const fn reaction(self) -> Reaction {
        match self {
            Self::Obstacle => Reaction {
                sounds: &[SoundId::Meow],
                stun: true,
                shake: true,
                ..Reaction::NONE
            },
            Self::Snack => Reaction {
                sounds: &[SoundId::Pop],
                score_delta: 1,
                grow: 0.006,
                despawn_other: true,
                ..Reaction::NONE
            },
            Self::BlandSnack => Reaction {
                sounds: &[SoundId::Pop],
                score_delta: 1,
                despawn_other: true,
                ..Reaction::NONE
            },
            Self::Spoiled => Reaction {
                sounds: &[SoundId::Meow],
                score_delta: -10,
                stun: true,
                shake: true,
                grow: -0.1,
                despawn_other: true,
                ..Reaction::NONE
            },
            Self::Car => Reaction {
                sounds: &[SoundId::CarHorn],
                stun: true,
                shake: true,
                ..Reaction::NONE
            },
            Self::Tram => Reaction {
                sounds: &[SoundId::TramHorn],
                stun: true,
                shake: true,
                ..Reaction::NONE
            },
            Self::Cyclist => Reaction {
                sounds: &[SoundId::Bell],
                stun: true,
                shake: true,
                ..Reaction::NONE
            },
            Self::Pedestrian => Reaction {
                sounds: &[SoundId::Shout],
                score_delta: -5,
                stun: true,
                ..Reaction::NONE
            },
            Self::Ferry => Reaction {
                sounds: &[SoundId::FerryHorn],
                stun: true,
                shake: true,
                ..Reaction::NONE
            },
            Self::Canal => Reaction {
                sounds: &[SoundId::Splash],
                stun: true,
                ..Reaction::NONE
            },
            Self::Pothole => Reaction {
                sounds: &[SoundId::Thud],
                ..Reaction::NONE
            },
            Self::DespawnStrip => Reaction::NONE,
        }
    }
}

/// Currently overlapping sensor/target pairs.
#[derive(Resource, Debug, Default)]
pub struct ContactTracker {
    active: HashSet<(Entity, Entity)>,
}

/// A sensor started overlapping a categorised actor.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactBegan {
    /// The probing entity (player or despawn strip).
    pub sensor: Entity,
    /// The actor it touched.
    pub other: Entity,
    /// Category of the touched actor.
    pub category: Category,
}

/// A previously overlapping pair separated.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEnded {
    /// The probing entity.
    pub sensor: Entity,
    /// The actor it no longer touches.
    pub other: Entity,
}

fn effective_half_extents(hitbox: &Hitbox, scale: Option<&SpriteScale>) -> glam::Vec2 {
    scale.map_or(hitbox.half_extents, |s| hitbox.half_extents * s.0)
}

fn overlaps(
    (pa, ha, sa): (&Position, &Hitbox, Option<&SpriteScale>),
    (pb, hb, sb): (&Position, &Hitbox, Option<&SpriteScale>),
) -> bool {
    let ca = ha.center(pa.0);
    let cb = hb.center(pb.0);
    let ea = effective_half_extents(ha, sa);
    let eb = effective_half_extents(hb, sb);
    (ca.x - cb.x).abs() <= ea.x + eb.x && (ca.y - cb.y).abs() <= ea.y + eb.y
}

/// Detects sensor/actor overlaps and emits begin/end events once per
/// contact.
pub fn detect_contacts_system(
    mut tracker: ResMut<ContactTracker>,
    mut began: EventWriter<ContactBegan>,
    mut ended: EventWriter<ContactEnded>,
    sensors: Query<(Entity, &Position, &Hitbox, Option<&SpriteScale>), With<SensesContacts>>,
    targets: Query<(Entity, &Position, &Hitbox, Option<&SpriteScale>, &Category)>,
) {
    let mut current = HashSet::new();
    for (sensor, sp, sh, ss) in &sensors {
        for (other, tp, th, ts, &category) in &targets {
            if sensor == other {
                continue;
            }
            if overlaps((sp, sh, ss), (tp, th, ts)) {
                current.insert((sensor, other));
                if !tracker.active.contains(&(sensor, other)) {
                    began.send(ContactBegan {
                        sensor,
                        other,
                        category,
                    });
                }
            }
        }
    }
    for &(sensor, other) in tracker.active.iter() {
        if !current.contains(&(sensor, other)) {
            ended.send(ContactEnded { sensor, other });
        }
    }
    tracker.active = current;
}

/// Executes the dispatch table for contacts involving the player.
///
/// While the player is not ready no reaction is processed at all, so a
/// sustained overlap cannot produce a reaction storm. Actors already
/// marked [`Struck`] cannot hurt or score again.
#[expect(
    clippy::too_many_arguments,
    reason = "dispatch touches every effect channel by design"
)]
pub fn player_reaction_system(
    mut commands: Commands,
    clock: Res<VirtualClock>,
    mut timers: ResMut<TimerQueue>,
    mut rng: ResMut<SimRng>,
    mut score: ResMut<Score>,
    mut began: EventReader<ContactBegan>,
    mut players: Query<(Entity, &mut Player, Option<&mut SpriteScale>)>,
    mut others: Query<Option<&mut Struck>, With<Category>>,
    mut sounds: EventWriter<SoundRequest>,
    mut scenes: EventWriter<SceneRequest>,
    mut shakes: EventWriter<ShakeRequest>,
) {
    for contact in began.read() {
        let Ok((player_entity, mut player, scale)) = players.get_mut(contact.sensor) else {
            continue;
        };
        if !player.is_ready() {
            continue;
        }
        let reaction = contact.category.reaction();
        if reaction == Reaction::NONE {
            continue;
        }

        // Hazards that linger (runner obstacles) only count once.
        if let Ok(Some(mut struck)) = others.get_mut(contact.other) {
            if reaction.stun && struck.0 {
                continue;
            }
            struck.0 = true;
        }

        log::debug!(
            "player contact with {:?}: {:?}",
            contact.category,
            reaction
        );

        score.add(reaction.score_delta);
        if let Some(mut scale) = scale {
            if reaction.grow != 0.0 {
                let grown = (scale.0 + glam::Vec2::splat(reaction.grow))
                    .max(glam::Vec2::splat(MIN_SPRITE_SCALE));
                scale.0 = grown;
            }
        }
        if let Some(&sound) = pick(&mut rng, reaction.sounds) {
            sounds.send(SoundRequest { sound, volume: 0.5 });
        }
        if reaction.shake {
            shakes.send(ShakeRequest);
        }
        if reaction.stun {
            player.begin_stun();
            timers.schedule_in(
                &clock,
                stun_blink_interval(),
                player_entity,
                TimerAction::BlinkTick,
            );
        }
        if reaction.despawn_other {
            commands.entity(contact.other).despawn();
        }
        if let Some(scene) = reaction.scene {
            scenes.send(SceneRequest(scene));
        }
    }
}

fn pick<'a, T>(rng: &mut SimRng, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let index = rng.0.gen_range(0..items.len());
    items.get(index)
}
