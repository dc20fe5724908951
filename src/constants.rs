//! Gameplay constants shared across systems.
//!
//! Values mirror the hand-tuned numbers from the original scene scripts and
//! are hardcoded rather than loaded from configuration.

/// Distance below which an actor is considered to have reached its target
/// waypoint. Fixed on purpose; it is not scaled by frame time or speed, so
/// very fast actors can overshoot at low frame rates.
pub const ARRIVAL_THRESHOLD: f32 = 1.0;
/// Default linear speed for route followers, in world units per second.
pub const DEFAULT_FOLLOW_SPEED: f32 = 100.0;
/// Number of opacity blinks a stunned player goes through.
pub const STUN_BLINKS: u8 = 10;
/// Total length of a stun, in simulated seconds.
pub const STUN_DURATION_SECS: f32 = 2.0;
/// Distance at which a driven player stops short of the steer target.
pub const DRIVE_STOP_DISTANCE: f32 = 5.0;
/// Logical screen width the host engine presents.
pub const SCREEN_WIDTH: f32 = 960.0;
/// Logical screen height the host engine presents.
pub const SCREEN_HEIGHT: f32 = 540.0;
/// Quantisation cell edge for the spawn registry, in world units.
pub const SPAWN_CELL_SIZE: f32 = 40.0;
/// Smallest sprite scale the collector player can shrink to.
pub const MIN_SPRITE_SCALE: f32 = 0.2;

/// Interval between two blink ticks of a stun.
#[must_use]
pub fn stun_blink_interval() -> f32 {
    STUN_DURATION_SECS / f32::from(STUN_BLINKS)
}
