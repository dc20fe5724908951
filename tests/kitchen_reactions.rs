//! Integration tests for the collector level's contact reactions: snack
//! scoring and growth, and the full spoiled-item stun cycle.

use approx::assert_relative_eq;
use glam::Vec2;
use scheldt::collision::Category;
use scheldt::components::{Hitbox, Opacity, Position, SpriteScale};
use scheldt::player::Player;
use scheldt::{SceneId, Sim};

mod common;
use common::{count_category, player_is_ready, remove_spawners, sim, step_for, DT};

fn player_scale(sim: &mut Sim) -> Vec2 {
    let world = sim.world_mut();
    let mut query = world.query::<(&Player, &SpriteScale)>();
    query.iter(world).next().expect("player").1 .0
}

fn player_opacity(sim: &mut Sim) -> f32 {
    let world = sim.world_mut();
    let mut query = world.query::<(&Player, &Opacity)>();
    query.iter(world).next().expect("player").1 .0
}

fn drop_on_player(sim: &mut Sim, category: Category) {
    let player_pos = sim.player_position().expect("player");
    sim.world_mut().spawn((
        Position(player_pos),
        category,
        Hitbox::centered(40.0, 40.0),
    ));
}

#[test]
fn snack_scores_grows_and_despawns() {
    let mut sim = sim(SceneId::Kitchen, 7);
    remove_spawners(&mut sim);

    drop_on_player(&mut sim, Category::Snack);
    sim.step(DT);

    assert_eq!(sim.score(), 1);
    assert_eq!(count_category(&mut sim, Category::Snack), 0);
    assert_relative_eq!(player_scale(&mut sim).x, 0.206, epsilon = 1e-5);
    assert!(player_is_ready(&mut sim));
}

#[test]
fn bland_snack_scores_without_growth() {
    let mut sim = sim(SceneId::Kitchen, 7);
    remove_spawners(&mut sim);

    drop_on_player(&mut sim, Category::BlandSnack);
    sim.step(DT);

    assert_eq!(sim.score(), 1);
    assert_relative_eq!(player_scale(&mut sim).x, 0.2, epsilon = 1e-6);
}

#[test]
fn spoiled_item_stuns_and_control_returns_after_the_blink_cycle() {
    let mut sim = sim(SceneId::Kitchen, 7);
    remove_spawners(&mut sim);

    drop_on_player(&mut sim, Category::Spoiled);
    sim.step(DT);

    // Stunned immediately; the score floor stops the penalty at zero and
    // the scale floor stops the shrink.
    assert!(!player_is_ready(&mut sim));
    assert_eq!(sim.score(), 0);
    assert!(player_scale(&mut sim).x >= 0.2 - f32::EPSILON);
    assert_eq!(count_category(&mut sim, Category::Spoiled), 0);

    // Mid-cycle the avatar blinks translucent.
    step_for(&mut sim, 0.25);
    assert_relative_eq!(player_opacity(&mut sim), 0.5);
    assert!(!player_is_ready(&mut sim));

    // The cycle runs two seconds; afterwards control and opacity return.
    step_for(&mut sim, 2.0);
    assert!(player_is_ready(&mut sim));
    assert_relative_eq!(player_opacity(&mut sim), 1.0);
}

#[test]
fn contacts_are_ignored_while_stunned() {
    let mut sim = sim(SceneId::Kitchen, 7);
    remove_spawners(&mut sim);

    drop_on_player(&mut sim, Category::Spoiled);
    sim.step(DT);
    assert!(!player_is_ready(&mut sim));

    // A snack landing during the stun neither scores nor despawns.
    drop_on_player(&mut sim, Category::Snack);
    sim.step(DT);
    assert_eq!(sim.score(), 0);
    assert_eq!(count_category(&mut sim, Category::Snack), 1);
}
