//! Start, instruction, and terminal screens.
//!
//! A screen is a scene with no gameplay: it waits for an advance input and
//! requests the next scene, or (for terminal screens) waits forever.

use bevy_ecs::prelude::*;

use crate::effects::{SceneId, SceneRequest};
use crate::player::InputCommand;

/// Where the current screen leads.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenFlow {
    /// Scene an advance input leads to; `None` on terminal screens.
    pub next: Option<SceneId>,
}

/// Title card leading to the instructions.
pub fn setup_start(world: &mut World) {
    world.insert_resource(ScreenFlow {
        next: Some(SceneId::Instructions),
    });
}

/// Instruction card leading into the first level.
pub fn setup_instructions(world: &mut World) {
    world.insert_resource(ScreenFlow {
        next: Some(SceneId::Runner),
    });
}

/// Game-over and finish screens; the flow ends here.
pub fn setup_terminal(world: &mut World) {
    world.insert_resource(ScreenFlow { next: None });
}

/// Requests the next scene when the player taps through a screen.
pub fn advance_screen_system(
    flow: Option<Res<ScreenFlow>>,
    mut input: EventReader<InputCommand>,
    mut scenes: EventWriter<SceneRequest>,
) {
    let Some(flow) = flow else {
        return;
    };
    let Some(next) = flow.next else {
        return;
    };
    if input.read().any(|command| *command == InputCommand::Advance) {
        scenes.send(SceneRequest(next));
    }
}
