//! Periodic spawners, the spawn registry, and despawn strips.
//!
//! Spawners re-arm themselves through the timer queue with a randomised
//! interval drawn from the level-seeded [`SimRng`], so a run is fully
//! reproducible. The [`SpawnRegistry`] replaces the original process-wide
//! spawn-dedup table: it is a plain resource owned by the level instance
//! and is dropped with it, so nothing leaks across restarts.

use bevy_ecs::prelude::*;
use glam::Vec2;
use hashbrown::HashSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::{TimerAction, TimerFired, TimerQueue, VirtualClock};
use crate::collision::{Category, ContactBegan};
use crate::components::{Facing, Hitbox, Position, SensesContacts, Struck};
use crate::constants::{SCREEN_WIDTH, SPAWN_CELL_SIZE};
use crate::motion::LinearMover;
use crate::route::{FollowConfig, Route, RouteFollower};
use crate::score::Score;

/// Deterministic random source for the whole simulation.
#[derive(Resource, Debug)]
pub struct SimRng(pub StdRng);

impl SimRng {
    /// RNG seeded for a reproducible run.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

/// Occupancy grid preventing actors from spawning on top of each other.
///
/// Rebuilt each frame from actor positions; a claim lasts until the next
/// refresh. Scoped to the level instance, never global.
#[derive(Resource, Debug, Default)]
pub struct SpawnRegistry {
    occupied: HashSet<(i32, i32)>,
}

impl SpawnRegistry {
    fn cell(point: Vec2) -> (i32, i32) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "world coordinates stay well inside i32 range"
        )]
        let cell = (
            (point.x / SPAWN_CELL_SIZE).floor() as i32,
            (point.y / SPAWN_CELL_SIZE).floor() as i32,
        );
        cell
    }

    /// Replaces the occupancy set with the given actor positions.
    pub fn refresh(&mut self, positions: impl Iterator<Item = Vec2>) {
        self.occupied.clear();
        for position in positions {
            self.occupied.insert(Self::cell(position));
        }
    }

    /// Claims the cell containing `point`; false when already occupied.
    pub fn try_claim(&mut self, point: Vec2) -> bool {
        self.occupied.insert(Self::cell(point))
    }
}

/// Rebuilds the registry from the positions of categorised actors.
pub fn refresh_spawn_registry_system(
    mut registry: ResMut<SpawnRegistry>,
    actors: Query<&Position, With<Category>>,
) {
    registry.refresh(actors.iter().map(|p| p.0));
}

/// What a spawner emits each wave.
#[derive(Debug, Clone)]
pub enum SpawnKind {
    /// A runner obstacle scrolling in from the right edge.
    RunnerObstacle,
    /// A falling snack or hazard; speed scales with the score.
    KitchenDrop,
    /// A pedestrian walking the given quay route.
    QuayPedestrian(Route),
}

/// Periodic spawner re-armed through the timer queue.
#[derive(Component, Debug, Clone)]
pub struct Spawner {
    /// What each wave produces.
    pub kind: SpawnKind,
    /// Shortest re-arm interval in seconds.
    pub min_interval: f32,
    /// Longest re-arm interval in seconds.
    pub max_interval: f32,
}

/// Emits waves for spawners whose timer fired and re-arms them.
///
/// A wave whose spawner has been despawned is dropped silently.
#[expect(
    clippy::too_many_arguments,
    reason = "spawning touches the clock, RNG, registry, and score by design"
)]
pub fn spawn_wave_system(
    mut commands: Commands,
    clock: Res<VirtualClock>,
    mut timers: ResMut<TimerQueue>,
    mut rng: ResMut<SimRng>,
    mut registry: ResMut<SpawnRegistry>,
    score: Res<Score>,
    mut fired: EventReader<TimerFired>,
    spawners: Query<(&Spawner, &Position)>,
) {
    for event in fired.read() {
        if event.action != TimerAction::SpawnWave {
            continue;
        }
        let Ok((spawner, origin)) = spawners.get(event.target) else {
            // Anchor despawned after scheduling; fire and forget.
            continue;
        };

        let mut interval = rng.0.gen_range(spawner.min_interval..=spawner.max_interval);
        match &spawner.kind {
            SpawnKind::RunnerObstacle => {
                commands.spawn((
                    Position(origin.0),
                    LinearMover::leftward(300.0),
                    Category::Obstacle,
                    Struck(false),
                    Hitbox::centered(60.0, 60.0),
                ));
            }
            SpawnKind::KitchenDrop => {
                #[expect(
                    clippy::cast_precision_loss,
                    reason = "scores stay far below f32 precision limits"
                )]
                let speed = 300.0 + 3.0 * score.value() as f32;
                let x = rng.0.gen_range(20.0..SCREEN_WIDTH - 20.0);
                let category = if rng.0.gen_range(0..10) < 2 {
                    Category::Spoiled
                } else if rng.0.gen_range(0..3) == 0 {
                    Category::BlandSnack
                } else {
                    Category::Snack
                };
                commands.spawn((
                    Position::new(x, -20.0),
                    LinearMover::falling(speed),
                    category,
                    Hitbox::centered(40.0, 40.0),
                ));
                // The original shortens the interval as the drops speed up.
                interval = rng.0.gen_range(150.0 / speed..350.0 / speed);
            }
            SpawnKind::QuayPedestrian(route) => {
                let start = route.point(0);
                if registry.try_claim(start) {
                    let speed = rng.0.gen_range(40.0..70.0);
                    commands.spawn((
                        Position(start),
                        RouteFollower::new(
                            route.clone(),
                            FollowConfig {
                                speed,
                                pause_delay: rng.0.gen_range(1.0..3.0),
                                ..FollowConfig::default()
                            },
                        ),
                        Category::Pedestrian,
                        Struck(false),
                        Facing::default(),
                        Hitbox::centered(24.0, 24.0),
                    ));
                }
            }
        }

        timers.schedule_in(&clock, interval, event.target, TimerAction::SpawnWave);
    }
}

/// Deletes whatever touches a despawn strip.
///
/// A runner obstacle that was never struck scores one dodge point on the
/// way out.
pub fn despawn_strip_system(
    mut commands: Commands,
    mut score: ResMut<Score>,
    mut began: EventReader<ContactBegan>,
    strips: Query<&Category, With<SensesContacts>>,
    struck: Query<&Struck>,
) {
    for contact in began.read() {
        let Ok(&Category::DespawnStrip) = strips.get(contact.sensor) else {
            continue;
        };
        if contact.category == Category::Obstacle {
            if let Ok(&Struck(false)) = struck.get(contact.other) {
                score.add(1);
                log::debug!("dodged obstacle {:?}", contact.other);
            }
        }
        commands.entity(contact.other).despawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_claims_each_cell_once() {
        let mut registry = SpawnRegistry::default();
        assert!(registry.try_claim(Vec2::new(10.0, 10.0)));
        // Same quantisation cell.
        assert!(!registry.try_claim(Vec2::new(12.0, 14.0)));
        // A different cell is free.
        assert!(registry.try_claim(Vec2::new(100.0, 10.0)));
    }

    #[test]
    fn refresh_reflects_actor_positions() {
        let mut registry = SpawnRegistry::default();
        assert!(registry.try_claim(Vec2::ZERO));
        registry.refresh(std::iter::once(Vec2::new(200.0, 200.0)));
        // The old claim is gone, the refreshed cell is taken.
        assert!(registry.try_claim(Vec2::ZERO));
        assert!(!registry.try_claim(Vec2::new(200.0, 200.0)));
    }
}
