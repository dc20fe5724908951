//! Shared helpers for driving a [`Sim`] in integration tests.

use glam::Vec2;
use scheldt::collision::Category;
use scheldt::components::Position;
use scheldt::player::Player;
use scheldt::spawn::Spawner;
use scheldt::{SceneId, Sim};

/// Frame step used by all integration tests.
#[allow(dead_code)]
pub const DT: f32 = 0.05;

/// Builds a scene, panicking on malformed level data.
#[allow(dead_code)]
pub fn sim(scene: SceneId, seed: u64) -> Sim {
    Sim::new(scene, seed).expect("failed to build scene")
}

/// Steps `sim` for `seconds` of virtual time at the common frame step.
#[allow(dead_code)]
pub fn step_for(sim: &mut Sim, seconds: f32) {
    let frames = (seconds / DT).round() as u32;
    for _ in 0..frames {
        sim.step(DT);
    }
}

/// Removes every periodic spawner so a test sees only its own actors.
#[allow(dead_code)]
pub fn remove_spawners(sim: &mut Sim) {
    let world = sim.world_mut();
    let spawners: Vec<_> = world
        .query_filtered::<bevy_ecs::entity::Entity, bevy_ecs::prelude::With<Spawner>>()
        .iter(world)
        .collect();
    for entity in spawners {
        world.despawn(entity);
    }
}

/// Number of live actors with the given category.
#[allow(dead_code)]
pub fn count_category(sim: &mut Sim, category: Category) -> usize {
    let world = sim.world_mut();
    world
        .query::<&Category>()
        .iter(world)
        .filter(|&&c| c == category)
        .count()
}

/// Whether the player avatar currently accepts reactions.
#[allow(dead_code)]
pub fn player_is_ready(sim: &mut Sim) -> bool {
    let world = sim.world_mut();
    world
        .query::<&Player>()
        .iter(world)
        .next()
        .is_some_and(Player::is_ready)
}

/// Teleports the player avatar, e.g. to stage a trigger-zone entry.
#[allow(dead_code)]
pub fn place_player(sim: &mut Sim, at: Vec2) {
    let world = sim.world_mut();
    let mut query = world.query::<(&Player, &mut Position)>();
    let (_, mut position) = query
        .iter_mut(world)
        .next()
        .expect("scene has no player avatar");
    position.0 = at;
}
