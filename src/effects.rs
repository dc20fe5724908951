//! Requests crossing the engine boundary.
//!
//! The gameplay core never draws, mixes audio, or changes scenes itself. It
//! emits these events and the host engine drains them after every step.
//! Identifiers are closed enums so a level cannot reference an asset the
//! host does not know about.

use bevy_ecs::prelude::*;
use serde::Serialize;

/// Scenes the game can ask the host to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
pub enum SceneId {
    /// Title card.
    Start,
    /// Instruction card shown before the first level.
    Instructions,
    /// Level 1, the side-scrolling jumper.
    Runner,
    /// Level 2, the falling-snack collector.
    Kitchen,
    /// Level 3, the top-down driving level.
    Traffic,
    /// Terminal screen once the countdown runs out.
    GameOver,
    /// Terminal screen after crossing the finish zone.
    Finish,
}

/// Sound clips the host engine is expected to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundId {
    /// Player hurt yelp.
    Meow,
    /// Snack collected.
    Pop,
    /// Bicycle bell.
    Bell,
    /// Tram warning horn.
    TramHorn,
    /// Car horn.
    CarHorn,
    /// Startled pedestrian.
    Shout,
    /// Falling into the canal.
    Splash,
    /// Ferry departure horn.
    FerryHorn,
    /// Dull pothole thud.
    Thud,
    /// Looping market-square ambience.
    MarketAmbience,
}

/// Ask the host to play a clip once (or loop it, for ambience zones).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SoundRequest {
    /// Which clip to play.
    pub sound: SoundId,
    /// Linear volume in `0.0..=1.0`.
    pub volume: f32,
}

/// Ask the host to tear down the current scene and present another.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneRequest(pub SceneId);

/// Ask the host for a brief camera shake.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShakeRequest;

/// Host notice that a previously requested clip finished playing.
///
/// Sound trigger zones use this to clear their debounce flag.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundFinished(pub SoundId);
