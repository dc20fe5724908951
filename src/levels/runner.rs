//! Level 1: the side-scrolling jumper.
//!
//! Obstacles scroll in from the right on a randomised interval; the player
//! jumps over them and scores a point for every obstacle that leaves the
//! left edge without a hit.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::clock::{TimerAction, TimerQueue, VirtualClock};
use crate::collision::Category;
use crate::components::{Facing, Hitbox, Opacity, Position, SensesContacts};
use crate::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::motion::Jumper;
use crate::player::Player;
use crate::spawn::{SpawnKind, Spawner};

/// Ground line the runner rests on.
pub const GROUND_Y: f32 = 520.0;

/// Populates the runner level.
pub fn setup(world: &mut World) {
    world.spawn((
        Player::new(0.0),
        Position::new(16.0, GROUND_Y),
        Jumper::on_ground(GROUND_Y),
        Facing::default(),
        Opacity::default(),
        Hitbox::centered(48.0, 64.0),
        SensesContacts,
    ));

    // Off-screen strip despawning obstacles and scoring dodges.
    world.spawn((
        Position::new(-100.0, SCREEN_HEIGHT / 2.0),
        Hitbox {
            half_extents: Vec2::new(10.0, 1.5 * SCREEN_HEIGHT),
            offset: Vec2::ZERO,
        },
        Category::DespawnStrip,
        SensesContacts,
    ));

    let spawner = world
        .spawn((
            Position::new(SCREEN_WIDTH + 30.0, GROUND_Y),
            Spawner {
                kind: SpawnKind::RunnerObstacle,
                min_interval: 1.5,
                max_interval: 3.5,
            },
        ))
        .id();
    let clock = *world.resource::<VirtualClock>();
    world
        .resource_mut::<TimerQueue>()
        .schedule_in(&clock, 0.0, spawner, TimerAction::SpawnWave);
}
