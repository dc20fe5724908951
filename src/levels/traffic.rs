//! Level 3: top-down driving through the old town.
//!
//! The player steers a scooter through looping traffic (cars on the ring
//! road, a tram with stops, cyclists), dodges canals and potholes, and has
//! to reach the garage before the countdown runs out. A ferry shuttles
//! across the canal and boards waiting quay pedestrians whenever its
//! hand-off timer fires while it is docked.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::camera::{CameraBounds, CameraFocus};
use crate::clock::{TimerAction, TimerFired, TimerQueue, VirtualClock};
use crate::collision::Category;
use crate::components::{Facing, Hitbox, Opacity, Position, SensesContacts, SpriteScale};
use crate::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::effects::{SceneId, SoundId, SoundRequest};
use crate::player::Player;
use crate::route::{FollowConfig, Route, RouteError, RouteFollower};
use crate::score::Countdown;
use crate::spawn::{SpawnKind, Spawner};
use crate::trigger::{Polygon, TriggerEffect, TriggerZone};

/// Background map dimensions in world units.
pub const WORLD_SIZE: Vec2 = Vec2::new(3282.0, 1846.0);

/// Seconds on the clock to reach the garage.
pub const TIME_LIMIT_SECS: f32 = 120.0;

/// How often the docked ferry checks the quay for passengers.
const FERRY_HANDOFF_SECS: f32 = 10.0;

/// Pick-up radius around the docked ferry.
const FERRY_BOARD_RADIUS: f32 = 140.0;

// Hand-traced road geometry, clockwise around the ring road.
const RING_ROAD: &[(f32, f32)] = &[
    (340.0, 360.0),
    (780.0, 320.0),
    (1260.0, 300.0),
    (1740.0, 330.0),
    (2220.0, 380.0),
    (2660.0, 470.0),
    (2940.0, 640.0),
    (3100.0, 920.0),
    (3040.0, 1180.0),
    (2860.0, 1400.0),
    (2520.0, 1540.0),
    (2080.0, 1600.0),
    (1600.0, 1580.0),
    (1140.0, 1520.0),
    (720.0, 1400.0),
    (420.0, 1200.0),
    (280.0, 920.0),
    (270.0, 620.0),
];

const TRAM_LINE: &[(f32, f32)] = &[
    (220.0, 760.0),
    (760.0, 740.0),
    (1320.0, 720.0),
    (1900.0, 740.0),
    (2460.0, 790.0),
    (2980.0, 860.0),
];

// The tram halts at its two stops.
const TRAM_STOPS: &[(f32, f32)] = &[(760.0, 740.0), (2460.0, 790.0)];

const CYCLE_PATH: &[(f32, f32)] = &[
    (560.0, 500.0),
    (1080.0, 480.0),
    (1620.0, 520.0),
    (1620.0, 1060.0),
    (1080.0, 1120.0),
    (560.0, 1060.0),
];

// A courier cuts across town once and leaves at the last waypoint.
const COURIER_RUN: &[(f32, f32)] = &[
    (3160.0, 1700.0),
    (2600.0, 1260.0),
    (1980.0, 1000.0),
    (1340.0, 860.0),
    (700.0, 620.0),
    (120.0, 420.0),
];

// Ferry crossing, north bank to south bank.
const FERRY_CROSSING: &[(f32, f32)] = &[(2380.0, 980.0), (2380.0, 1360.0)];

// Pedestrians amble along the north quay toward the landing.
const QUAY_WALK: &[(f32, f32)] = &[(2060.0, 940.0), (2260.0, 940.0), (2360.0, 960.0)];

/// Populates the driving level.
///
/// # Errors
///
/// Returns [`RouteError`] if any authored route is empty.
pub fn setup(world: &mut World) -> Result<(), RouteError> {
    world.insert_resource(Countdown::new(TIME_LIMIT_SECS));
    world.insert_resource(CameraBounds {
        world: WORLD_SIZE,
        screen: Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
    });
    world.insert_resource(CameraFocus::default());

    world.spawn((
        Player::new(200.0),
        Position::new(2938.0, 808.0),
        Facing::default(),
        Opacity::default(),
        SpriteScale(Vec2::splat(0.12)),
        Hitbox::centered(300.0, 300.0),
        SensesContacts,
    ));

    spawn_ring_cars(world)?;
    spawn_tram(world)?;
    spawn_cyclists(world)?;
    spawn_courier(world)?;
    let ferry = spawn_ferry(world)?;
    arm_ferry_handoff(world, ferry);
    spawn_quay(world)?;
    spawn_hazards(world);
    spawn_zones(world);
    Ok(())
}

fn spawn_ring_cars(world: &mut World) -> Result<(), RouteError> {
    let ring = Route::from_coords(RING_ROAD)?;
    for (start_index, speed) in [(0, 160.0), (6, 180.0), (12, 140.0)] {
        let follower = RouteFollower::new(
            ring.clone(),
            FollowConfig {
                start_index,
                speed,
                hitbox_offset_y: 14.0,
                ..FollowConfig::default()
            },
        );
        world.spawn((
            Position(ring.point(start_index)),
            follower,
            Category::Car,
            Facing::default(),
            Hitbox {
                half_extents: Vec2::new(44.0, 22.0),
                offset: Vec2::new(0.0, 14.0),
            },
        ));
    }
    Ok(())
}

fn spawn_tram(world: &mut World) -> Result<(), RouteError> {
    let line = Route::from_coords(TRAM_LINE)?;
    let stops = TRAM_STOPS.iter().map(|&(x, y)| Vec2::new(x, y)).collect();
    let follower = RouteFollower::new(
        line.clone(),
        FollowConfig {
            speed: 120.0,
            pause_delay: 4.0,
            pause_points: Some(stops),
            ..FollowConfig::default()
        },
    );
    world.spawn((
        Position(line.point(0)),
        follower,
        Category::Tram,
        Facing::default(),
        Hitbox::centered(160.0, 40.0),
    ));
    Ok(())
}

fn spawn_cyclists(world: &mut World) -> Result<(), RouteError> {
    let path = Route::from_coords(CYCLE_PATH)?;
    for start_index in [0, 3] {
        let follower = RouteFollower::new(
            path.clone(),
            FollowConfig {
                start_index,
                speed: 90.0,
                pause_delay: 2.0,
                pause_points: Some(vec![path.point(0)]),
                ..FollowConfig::default()
            },
        );
        world.spawn((
            Position(path.point(start_index)),
            follower,
            Category::Cyclist,
            Facing::default(),
            Hitbox::centered(30.0, 30.0),
        ));
    }
    Ok(())
}

fn spawn_courier(world: &mut World) -> Result<(), RouteError> {
    let run = Route::from_coords(COURIER_RUN)?;
    let follower = RouteFollower::new(
        run.clone(),
        FollowConfig {
            speed: 220.0,
            despawn_on_last: true,
            ..FollowConfig::default()
        },
    );
    world.spawn((
        Position(run.point(0)),
        follower,
        Category::Cyclist,
        Facing::default(),
        Hitbox::centered(30.0, 30.0),
    ));
    Ok(())
}

fn spawn_ferry(world: &mut World) -> Result<Entity, RouteError> {
    let crossing = Route::from_coords(FERRY_CROSSING)?;
    let banks = crossing.points().to_vec();
    let follower = RouteFollower::new(
        crossing.clone(),
        FollowConfig {
            speed: 60.0,
            control_facing: false,
            pause_delay: 12.0,
            pause_points: Some(banks),
            ..FollowConfig::default()
        },
    );
    Ok(world
        .spawn((
            Position(crossing.point(0)),
            follower,
            Category::Ferry,
            Hitbox::centered(120.0, 60.0),
        ))
        .id())
}

fn arm_ferry_handoff(world: &mut World, ferry: Entity) {
    let clock = *world.resource::<VirtualClock>();
    world.resource_mut::<TimerQueue>().schedule_in(
        &clock,
        FERRY_HANDOFF_SECS,
        ferry,
        TimerAction::FerryHandOff,
    );
}

fn spawn_quay(world: &mut World) -> Result<(), RouteError> {
    let walk = Route::from_coords(QUAY_WALK)?;
    let spawner = world
        .spawn((
            Position(walk.point(0)),
            Spawner {
                kind: SpawnKind::QuayPedestrian(walk),
                min_interval: 4.0,
                max_interval: 9.0,
            },
        ))
        .id();
    let clock = *world.resource::<VirtualClock>();
    world
        .resource_mut::<TimerQueue>()
        .schedule_in(&clock, 0.0, spawner, TimerAction::SpawnWave);
    Ok(())
}

fn spawn_hazards(world: &mut World) {
    // The canal the ferry crosses; falling in stuns and snaps back.
    world.spawn((
        Position::new(2380.0, 1170.0),
        Hitbox::centered(360.0, 300.0),
        Category::Canal,
    ));
    for &(x, y) in &[(980.0, 1340.0), (1840.0, 420.0), (2700.0, 1180.0)] {
        world.spawn((
            Position::new(x, y),
            Hitbox::centered(36.0, 36.0),
            Category::Pothole,
        ));
    }
}

fn spawn_zones(world: &mut World) {
    // Garage forecourt; arriving here wins the level.
    world.spawn(TriggerZone::new(
        Polygon::from_coords(&[
            (80.0, 340.0),
            (300.0, 340.0),
            (300.0, 540.0),
            (80.0, 540.0),
        ]),
        TriggerEffect::Scene(SceneId::Finish),
    ));
    // Market square ambience, looped while the clip plays.
    world.spawn(TriggerZone::new(
        Polygon::from_coords(&[
            (1200.0, 900.0),
            (1720.0, 900.0),
            (1720.0, 1320.0),
            (1200.0, 1320.0),
        ]),
        TriggerEffect::Sound(SoundId::MarketAmbience),
    ));
}

/// Boards a waiting pedestrian whenever the docked ferry's hand-off fires.
///
/// The timer chain re-arms itself for as long as the ferry exists; a firing
/// against a despawned ferry ends the chain.
pub fn ferry_handoff_system(
    mut commands: Commands,
    clock: Res<VirtualClock>,
    mut timers: ResMut<TimerQueue>,
    mut fired: EventReader<TimerFired>,
    ferries: Query<(&Position, &RouteFollower), With<Category>>,
    pedestrians: Query<(Entity, &Position, &Category)>,
    mut sounds: EventWriter<SoundRequest>,
) {
    for event in fired.read() {
        if event.action != TimerAction::FerryHandOff {
            continue;
        }
        let Ok((ferry_pos, follower)) = ferries.get(event.target) else {
            continue;
        };
        if follower.is_paused() {
            let boarded = pedestrians
                .iter()
                .filter(|(_, _, &category)| category == Category::Pedestrian)
                .find(|(_, pos, _)| pos.0.distance(ferry_pos.0) <= FERRY_BOARD_RADIUS);
            if let Some((passenger, _, _)) = boarded {
                log::debug!("ferry boards pedestrian {passenger:?}");
                commands.entity(passenger).despawn();
                sounds.send(SoundRequest {
                    sound: SoundId::FerryHorn,
                    volume: 0.6,
                });
            }
        }
        timers.schedule_in(
            &clock,
            FERRY_HANDOFF_SECS,
            event.target,
            TimerAction::FerryHandOff,
        );
    }
}
