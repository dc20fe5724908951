//! Deterministic simulation harness.
//!
//! [`Sim`] owns the ECS world and a fixed system schedule, stepped with an
//! explicit `dt` from a virtual clock. The host engine feeds input events
//! in, drains sound/scene/shake requests out, and owns everything the core
//! does not: rendering, audio playback, and real time. Two `Sim`s built
//! from the same scene and seed and stepped identically produce identical
//! worlds.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::camera::{camera_follow_system, CameraFocus};
use crate::clock::{fire_due_timers_system, TimerFired, TimerQueue, VirtualClock};
use crate::collision::{
    detect_contacts_system, player_reaction_system, ContactBegan, ContactEnded, ContactTracker,
};
use crate::components::Position;
use crate::effects::{
    SceneId, SceneRequest, ShakeRequest, SoundFinished, SoundId, SoundRequest,
};
use crate::levels::{self, screens::advance_screen_system, traffic::ferry_handoff_system};
use crate::motion::{jumper_system, linear_mover_system};
use crate::player::{
    apply_input_system, blink_tick_system, drive_player_system, lane_follow_system,
    record_last_good_system, InputCommand, Player,
};
use crate::route::{
    follow_route_system, resume_followers_system, FollowerMoved, RouteCompleted, RouteError,
};
use crate::score::{countdown_system, Countdown, Score};
use crate::spawn::{
    despawn_strip_system, refresh_spawn_registry_system, spawn_wave_system, SimRng, SpawnRegistry,
};
use crate::trigger::{sound_finished_system, trigger_zone_system};

/// A complete, steppable game simulation for one scene.
pub struct Sim {
    world: World,
    schedule: Schedule,
}

impl Sim {
    /// Builds the world for `scene`, seeding all randomness from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] if the scene's authored route data is
    /// malformed.
    pub fn new(scene: SceneId, seed: u64) -> Result<Self, RouteError> {
        let mut world = World::new();
        world.init_resource::<VirtualClock>();
        world.init_resource::<TimerQueue>();
        world.insert_resource(SimRng::seeded(seed));
        world.init_resource::<SpawnRegistry>();
        world.init_resource::<ContactTracker>();
        world.init_resource::<Score>();

        world.init_resource::<Events<InputCommand>>();
        world.init_resource::<Events<TimerFired>>();
        world.init_resource::<Events<FollowerMoved>>();
        world.init_resource::<Events<RouteCompleted>>();
        world.init_resource::<Events<ContactBegan>>();
        world.init_resource::<Events<ContactEnded>>();
        world.init_resource::<Events<SoundRequest>>();
        world.init_resource::<Events<SceneRequest>>();
        world.init_resource::<Events<ShakeRequest>>();
        world.init_resource::<Events<SoundFinished>>();

        levels::setup(&mut world, scene)?;
        log::info!("scene {scene:?} ready, seed {seed}");

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                // Deliver timers before anything consumes them.
                (
                    fire_due_timers_system,
                    resume_followers_system,
                    blink_tick_system,
                    spawn_wave_system,
                )
                    .chain(),
                // Input and bookkeeping before motion.
                (
                    apply_input_system,
                    advance_screen_system,
                    record_last_good_system,
                    refresh_spawn_registry_system,
                )
                    .chain(),
                // All motion, then the camera tracks the result.
                (
                    follow_route_system,
                    linear_mover_system,
                    jumper_system,
                    drive_player_system,
                    lane_follow_system,
                    camera_follow_system,
                )
                    .chain(),
                // Contacts and their consequences.
                (
                    detect_contacts_system,
                    player_reaction_system,
                    despawn_strip_system,
                    ferry_handoff_system,
                )
                    .chain(),
                // Zone triggers and the clock-out.
                (trigger_zone_system, sound_finished_system, countdown_system).chain(),
            )
                .chain(),
        );
        Ok(Self { world, schedule })
    }

    /// Advances the simulation by one frame of `dt` seconds.
    ///
    /// A non-positive `dt` still runs the schedule but moves nothing and
    /// fires no timers, so a paused host can keep pumping frames.
    pub fn step(&mut self, dt: f32) {
        self.world.resource_mut::<VirtualClock>().advance(dt);
        self.schedule.run(&mut self.world);
        self.flush_events();
    }

    fn flush_events(&mut self) {
        self.world.resource_mut::<Events<InputCommand>>().update();
        self.world.resource_mut::<Events<TimerFired>>().update();
        self.world.resource_mut::<Events<FollowerMoved>>().update();
        self.world.resource_mut::<Events<RouteCompleted>>().update();
        self.world.resource_mut::<Events<ContactBegan>>().update();
        self.world.resource_mut::<Events<SoundFinished>>().update();
    }

    /// Queues an input command for the next step.
    pub fn push_input(&mut self, command: InputCommand) {
        self.world.send_event(command);
    }

    /// Reports that the host finished playing `sound`.
    pub fn notify_sound_finished(&mut self, sound: SoundId) {
        self.world.send_event(SoundFinished(sound));
    }

    /// Drains sound requests queued since the last drain.
    pub fn drain_sounds(&mut self) -> Vec<SoundRequest> {
        self.world
            .resource_mut::<Events<SoundRequest>>()
            .drain()
            .collect()
    }

    /// Drains scene-change requests queued since the last drain.
    pub fn drain_scene_requests(&mut self) -> Vec<SceneRequest> {
        self.world
            .resource_mut::<Events<SceneRequest>>()
            .drain()
            .collect()
    }

    /// Drains contact-end notices queued since the last drain.
    ///
    /// The host uses these to stop contact-looped effects; contact begins
    /// stay internal, their consequences already arrive as sound, scene,
    /// and shake requests.
    pub fn drain_contact_ended(&mut self) -> Vec<ContactEnded> {
        self.world
            .resource_mut::<Events<ContactEnded>>()
            .drain()
            .collect()
    }

    /// Drains camera-shake requests, returning how many were queued.
    pub fn drain_shakes(&mut self) -> usize {
        self.world
            .resource_mut::<Events<ShakeRequest>>()
            .drain()
            .count()
    }

    /// Current score.
    #[must_use]
    pub fn score(&self) -> i32 {
        self.world.resource::<Score>().value()
    }

    /// Remaining countdown, if the scene runs one.
    #[must_use]
    pub fn countdown(&self) -> Option<f32> {
        self.world
            .get_resource::<Countdown>()
            .map(Countdown::remaining)
    }

    /// Where the camera looks, if the scene scrolls.
    #[must_use]
    pub fn camera_focus(&self) -> Option<Vec2> {
        self.world.get_resource::<CameraFocus>().map(|focus| focus.0)
    }

    /// The player avatar's position, if the scene has one.
    pub fn player_position(&mut self) -> Option<Vec2> {
        self.world
            .query_filtered::<&Position, With<Player>>()
            .iter(&self.world)
            .next()
            .map(|position| position.0)
    }

    /// Virtual time elapsed since the scene was built.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.world.resource::<VirtualClock>().now()
    }

    /// Read access to the world, for assertions.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Write access to the world, for test scaffolding.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
