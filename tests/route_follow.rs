//! Integration tests for route following through the full schedule: waypoint
//! arrival, looping, pause timers, and despawn-on-last termination.

use approx::assert_relative_eq;
use glam::Vec2;
use scheldt::components::{Facing, Position};
use scheldt::route::{FollowConfig, Route, RouteFollower};
use scheldt::SceneId;

mod common;
use common::{sim, step_for, DT};

fn follower_position(sim: &mut scheldt::Sim) -> Option<Vec2> {
    let world = sim.world_mut();
    let mut query = world.query::<(&RouteFollower, &Position)>();
    query.iter(world).next().map(|(_, p)| p.0)
}

fn follower_state(sim: &mut scheldt::Sim) -> Option<(usize, bool)> {
    let world = sim.world_mut();
    let mut query = world.query::<&RouteFollower>();
    query
        .iter(world)
        .next()
        .map(|f| (f.target_index(), f.is_paused()))
}

#[test]
fn follower_walks_the_segment_and_loops() {
    // A blank screen scene doubles as an empty arena.
    let mut sim = sim(SceneId::Start, 1);
    let route = Route::from_coords(&[(0.0, 0.0), (10.0, 0.0)]).expect("route");
    sim.world_mut().spawn((
        Position::new(0.0, 0.0),
        RouteFollower::with_speed(route, 10.0),
        Facing::default(),
    ));

    // Ten units per second reaches the arrival threshold of the far end
    // within a second and turns back toward the first waypoint.
    step_for(&mut sim, 1.0);
    let position = follower_position(&mut sim).expect("follower alive");
    assert_relative_eq!(position.x, 8.0, epsilon = 1e-4);
    let (index, paused) = follower_state(&mut sim).expect("follower alive");
    assert_eq!(index, 0, "target index wraps after the last waypoint");
    assert!(!paused);
}

#[test]
fn pause_point_holds_for_the_configured_delay() {
    let mut sim = sim(SceneId::Start, 1);
    let route = Route::from_coords(&[(0.0, 0.0), (100.0, 0.0)]).expect("route");
    sim.world_mut().spawn((
        Position::new(0.0, 0.0),
        RouteFollower::new(
            route,
            FollowConfig {
                speed: 100.0,
                pause_delay: 2.0,
                pause_points: Some(vec![Vec2::new(100.0, 0.0)]),
                ..FollowConfig::default()
            },
        ),
        Facing::default(),
    ));

    // Arrival after one second; the hold begins on the following frame.
    step_for(&mut sim, 1.5);
    let held_at = follower_position(&mut sim).expect("follower alive");
    assert_relative_eq!(held_at.x, 100.0);
    let (_, paused) = follower_state(&mut sim).expect("follower alive");
    assert!(paused, "follower should hold at the pause point");

    // Still held short of the full delay.
    step_for(&mut sim, 1.0);
    let still_held = follower_position(&mut sim).expect("follower alive");
    assert_relative_eq!(still_held.x, 100.0);

    // Delay elapsed: the resume timer fires and movement continues, now
    // heading back toward the first waypoint.
    step_for(&mut sim, 1.0 + 4.0 * DT);
    let resumed = follower_position(&mut sim).expect("follower alive");
    assert!(resumed.x < 100.0, "got {resumed:?}");
    let (_, paused) = follower_state(&mut sim).expect("follower alive");
    assert!(!paused);
}

#[test]
fn despawn_on_last_removes_the_actor() {
    let mut sim = sim(SceneId::Start, 1);
    let route = Route::from_coords(&[(0.0, 0.0), (50.0, 0.0), (50.0, 50.0)]).expect("route");
    sim.world_mut().spawn((
        Position::new(0.0, 0.0),
        RouteFollower::new(
            route,
            FollowConfig {
                speed: 100.0,
                despawn_on_last: true,
                ..FollowConfig::default()
            },
        ),
        Facing::default(),
    ));

    step_for(&mut sim, 0.5);
    assert!(follower_position(&mut sim).is_some());

    step_for(&mut sim, 1.0);
    assert!(
        follower_position(&mut sim).is_none(),
        "follower should despawn at the final waypoint"
    );
}

#[test]
fn leftward_travel_flips_the_sprite() {
    let mut sim = sim(SceneId::Start, 1);
    // Heading for the second waypoint first, the follower then turns back
    // leftward, which must flip the sprite.
    let route = Route::from_coords(&[(0.0, 0.0), (20.0, 0.0)]).expect("route");
    sim.world_mut().spawn((
        Position::new(0.0, 0.0),
        RouteFollower::with_speed(route, 20.0),
        Facing::default(),
    ));

    step_for(&mut sim, 0.5);
    let world = sim.world_mut();
    let mut query = world.query::<(&RouteFollower, &Facing)>();
    let (_, facing) = query.iter(world).next().expect("follower alive");
    assert!(!facing.flip_y, "rightward travel keeps the sprite upright");

    step_for(&mut sim, 1.0);
    let world = sim.world_mut();
    let mut query = world.query::<(&RouteFollower, &Facing)>();
    let (_, facing) = query.iter(world).next().expect("follower alive");
    assert!(facing.flip_y, "leftward travel flips the sprite");
}
