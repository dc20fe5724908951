//! Scripted level content.
//!
//! Each level module owns its hand-authored geometry (routes, trigger
//! polygons, spawn points) and a `setup` function that populates a fresh
//! world, in the spirit of the original scene scripts. Systems that exist
//! purely for one level (the ferry hand-off) also live with their level.

use bevy_ecs::prelude::*;

use crate::effects::SceneId;
use crate::route::RouteError;

pub mod kitchen;
pub mod runner;
pub mod screens;
pub mod traffic;

/// Populates `world` with the content of `scene`.
///
/// # Errors
///
/// Returns [`RouteError`] if a level's authored route data is malformed.
pub fn setup(world: &mut World, scene: SceneId) -> Result<(), RouteError> {
    match scene {
        SceneId::Start => screens::setup_start(world),
        SceneId::Instructions => screens::setup_instructions(world),
        SceneId::Runner => runner::setup(world),
        SceneId::Kitchen => kitchen::setup(world),
        SceneId::Traffic => traffic::setup(world)?,
        SceneId::GameOver | SceneId::Finish => screens::setup_terminal(world),
    }
    Ok(())
}
