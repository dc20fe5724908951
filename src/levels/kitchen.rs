//! Level 2: the falling-snack collector.
//!
//! Snacks and spoiled items fall from the top of the screen; the player
//! slides along the bottom lane following the pointer. Snacks score and
//! grow the sprite, spoiled items stun, shrink, and cost ten points, and
//! the drop speed scales with the score.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::clock::{TimerAction, TimerQueue, VirtualClock};
use crate::collision::Category;
use crate::components::{Facing, Hitbox, Opacity, Position, SensesContacts, SpriteScale};
use crate::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::player::Player;
use crate::spawn::{SpawnKind, Spawner};

/// Populates the collector level.
pub fn setup(world: &mut World) {
    world.spawn((
        Player::new(0.0),
        Position::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT),
        Facing::default(),
        Opacity::default(),
        SpriteScale(Vec2::splat(0.2)),
        Hitbox::centered(300.0, 300.0),
        SensesContacts,
    ));

    // Strip below the screen deleting anything the player missed.
    world.spawn((
        Position::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT + 100.0),
        Hitbox {
            half_extents: Vec2::new(1.5 * SCREEN_WIDTH, 10.0),
            offset: Vec2::ZERO,
        },
        Category::DespawnStrip,
        SensesContacts,
    ));

    let spawner = world
        .spawn((
            Position::new(SCREEN_WIDTH / 2.0, -20.0),
            Spawner {
                kind: SpawnKind::KitchenDrop,
                min_interval: 0.5,
                max_interval: 1.2,
            },
        ))
        .id();
    let clock = *world.resource::<VirtualClock>();
    world
        .resource_mut::<TimerQueue>()
        .schedule_in(&clock, 0.0, spawner, TimerAction::SpawnWave);
}
