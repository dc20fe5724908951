//! Integration tests for the runner level: obstacle spawning, jumping,
//! dodge scoring at the despawn strip, and getting hit.

use scheldt::collision::Category;
use scheldt::components::{Hitbox, Position, Struck};
use scheldt::motion::LinearMover;
use scheldt::player::InputCommand;
use scheldt::SceneId;

mod common;
use common::{count_category, player_is_ready, remove_spawners, sim, step_for, DT};

#[test]
fn first_obstacle_spawns_immediately() {
    let mut sim = sim(SceneId::Runner, 3);
    assert_eq!(count_category(&mut sim, Category::Obstacle), 0);
    sim.step(DT);
    assert_eq!(count_category(&mut sim, Category::Obstacle), 1);
}

#[test]
fn jump_lifts_the_player_and_gravity_brings_it_back() {
    let mut sim = sim(SceneId::Runner, 3);
    remove_spawners(&mut sim);
    let ground_y = sim.player_position().expect("player").y;

    sim.push_input(InputCommand::Jump);
    sim.step(DT);
    assert!(sim.player_position().expect("player").y < ground_y);

    // Airborne for well under two seconds with the original tuning.
    step_for(&mut sim, 2.0);
    assert_eq!(sim.player_position().expect("player").y, ground_y);
}

#[test]
fn unstruck_obstacle_scores_a_dodge_point_at_the_strip() {
    let mut sim = sim(SceneId::Runner, 3);
    remove_spawners(&mut sim);

    // An obstacle about to leave the screen, never touched by the player.
    sim.world_mut().spawn((
        Position::new(-50.0, 520.0),
        LinearMover::leftward(300.0),
        Category::Obstacle,
        Struck(false),
        Hitbox::centered(60.0, 60.0),
    ));

    step_for(&mut sim, 0.5);
    assert_eq!(sim.score(), 1);
    assert_eq!(count_category(&mut sim, Category::Obstacle), 0);
}

#[test]
fn struck_obstacle_does_not_score_at_the_strip() {
    let mut sim = sim(SceneId::Runner, 3);
    remove_spawners(&mut sim);

    sim.world_mut().spawn((
        Position::new(-50.0, 520.0),
        LinearMover::leftward(300.0),
        Category::Obstacle,
        Struck(true),
        Hitbox::centered(60.0, 60.0),
    ));

    step_for(&mut sim, 0.5);
    assert_eq!(sim.score(), 0);
    assert_eq!(count_category(&mut sim, Category::Obstacle), 0);
}

#[test]
fn standing_still_gets_the_player_hit() {
    let mut sim = sim(SceneId::Runner, 3);

    let mut was_stunned = false;
    for _ in 0..160 {
        sim.step(DT);
        if !player_is_ready(&mut sim) {
            was_stunned = true;
            break;
        }
    }
    assert!(
        was_stunned,
        "an unavoided obstacle should stun the player within eight seconds"
    );
    assert!(sim.drain_shakes() > 0, "a hit requests a camera shake");
}
