//! Integration tests for the screen flow between scenes.

use rstest::rstest;
use scheldt::player::InputCommand;
use scheldt::SceneId;

mod common;
use common::{sim, DT};

#[rstest]
#[case::title_leads_to_instructions(SceneId::Start, Some(SceneId::Instructions))]
#[case::instructions_lead_to_the_runner(SceneId::Instructions, Some(SceneId::Runner))]
#[case::game_over_is_terminal(SceneId::GameOver, None)]
#[case::finish_is_terminal(SceneId::Finish, None)]
fn advancing_a_screen(#[case] scene: SceneId, #[case] expected: Option<SceneId>) {
    let mut sim = sim(scene, 5);
    sim.push_input(InputCommand::Advance);
    sim.step(DT);

    let requested = sim
        .drain_scene_requests()
        .into_iter()
        .next()
        .map(|request| request.0);
    assert_eq!(requested, expected);
}

#[rstest]
#[case::jump(InputCommand::Jump)]
#[case::lane(InputCommand::Lane(100.0))]
fn gameplay_input_does_not_advance_screens(#[case] command: InputCommand) {
    let mut sim = sim(SceneId::Start, 5);
    sim.push_input(command);
    sim.step(DT);
    assert!(sim.drain_scene_requests().is_empty());
}
