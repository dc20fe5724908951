//! Score keeping and the driving level's countdown.

use bevy_ecs::prelude::*;
use serde::Serialize;

use crate::clock::VirtualClock;
use crate::effects::{SceneId, SceneRequest};

/// Score counter with floor/ceiling clamping on every mutation.
///
/// # Examples
///
/// ```
/// use scheldt::score::Score;
///
/// let mut score = Score::clamped(0, 100);
/// score.add(-5);
/// assert_eq!(score.value(), 0);
/// score.add(7);
/// assert_eq!(score.value(), 7);
/// ```
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    value: i32,
    floor: i32,
    ceiling: i32,
}

impl Default for Score {
    fn default() -> Self {
        Self::clamped(0, i32::MAX)
    }
}

impl Score {
    /// Zeroed score clamped to `floor..=ceiling`.
    #[must_use]
    pub fn clamped(floor: i32, ceiling: i32) -> Self {
        Self {
            value: floor.max(0).min(ceiling),
            floor,
            ceiling,
        }
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.value
    }

    /// Adds `delta`, clamping the result to the configured bounds.
    pub fn add(&mut self, delta: i32) {
        self.value = self
            .value
            .saturating_add(delta)
            .clamp(self.floor, self.ceiling);
    }
}

/// Remaining time for the driving level.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Countdown {
    remaining: f32,
    expired: bool,
}

impl Countdown {
    /// Countdown starting at `seconds`.
    #[must_use]
    pub const fn new(seconds: f32) -> Self {
        Self {
            remaining: seconds,
            expired: false,
        }
    }

    /// Seconds left, never below zero.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }

    /// Whether the countdown has run out.
    #[must_use]
    pub const fn expired(&self) -> bool {
        self.expired
    }

    /// Remaining time as `mm:ss` for the HUD.
    ///
    /// # Examples
    ///
    /// ```
    /// use scheldt::score::Countdown;
    ///
    /// assert_eq!(Countdown::new(119.4).formatted(), "01:59");
    /// assert_eq!(Countdown::new(0.0).formatted(), "00:00");
    /// ```
    #[must_use]
    pub fn formatted(&self) -> String {
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "remaining() is clamped non-negative and far below i32 range"
        )]
        let total = self.remaining().floor() as u32;
        format!("{:02}:{:02}", total / 60, total % 60)
    }
}

/// Ticks the countdown down and requests the game-over scene once expired.
pub fn countdown_system(
    clock: Res<VirtualClock>,
    countdown: Option<ResMut<Countdown>>,
    mut scenes: EventWriter<SceneRequest>,
) {
    let Some(mut countdown) = countdown else {
        return;
    };
    if countdown.expired {
        return;
    }
    countdown.remaining -= clock.dt();
    if countdown.remaining <= 0.0 {
        countdown.expired = true;
        log::info!("countdown expired");
        scenes.send(SceneRequest(SceneId::GameOver));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_clamps_at_floor_and_ceiling() {
        let mut score = Score::clamped(0, 10);
        score.add(-3);
        assert_eq!(score.value(), 0);
        score.add(25);
        assert_eq!(score.value(), 10);
    }

    #[test]
    fn countdown_formats_minutes_and_seconds() {
        assert_eq!(Countdown::new(120.0).formatted(), "02:00");
        assert_eq!(Countdown::new(61.0).formatted(), "01:01");
    }
}
