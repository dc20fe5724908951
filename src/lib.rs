//! Core simulation for a three-level arcade game set along the Scheldt.
//!
//! The crate is the deterministic half of the game: a headless ECS world
//! driven by a virtual clock, fed input events by the host engine, and
//! emitting sound, scene, and camera-shake requests back out. Rendering,
//! audio, and real devices stay on the host side of that seam, which is
//! what makes every level scriptable in tests.

pub mod camera;
pub mod clock;
pub mod collision;
pub mod components;
pub mod constants;
pub mod effects;
pub mod levels;
pub mod logging;
pub mod motion;
pub mod player;
pub mod route;
pub mod score;
pub mod sim;
pub mod spawn;
pub mod trigger;

pub use constants::*;

// Re-export commonly used items
pub use clock::{TimerAction, TimerQueue, VirtualClock};
pub use collision::{Category, ContactBegan, ContactEnded};
pub use components::{Facing, Hitbox, Opacity, Position, SensesContacts, SpriteScale};
pub use effects::{SceneId, SceneRequest, ShakeRequest, SoundFinished, SoundId, SoundRequest};
pub use logging::init as init_logging;
pub use player::{InputCommand, Player, PlayerState};
pub use route::{FollowConfig, Route, RouteError, RouteFollower};
pub use score::{Countdown, Score};
pub use sim::Sim;

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use scheldt::prelude::*;
    //! ```

    pub use crate::effects::SceneId;
    pub use crate::player::InputCommand;
    pub use crate::route::{FollowConfig, Route, RouteFollower};
    pub use crate::score::Score;
    pub use crate::sim::Sim;
}
