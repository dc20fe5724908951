//! The player avatar: input, driving, and the stun state machine.
//!
//! Input reaches the core as [`InputCommand`] events fed in by the host
//! engine. The avatar is either `Ready` or `Stunned`; a stun runs a fixed
//! blink-cycle countdown on the timer queue, ignores forward motion input,
//! snaps the avatar back to its last-known-good position halfway through,
//! and restores it again when the countdown completes.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::clock::{TimerAction, TimerFired, TimerQueue, VirtualClock};
use crate::components::{Facing, Opacity, Position};
use crate::constants::{stun_blink_interval, DRIVE_STOP_DISTANCE, STUN_BLINKS};
use crate::motion::Jumper;

/// Input the host engine translates from real devices.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum InputCommand {
    /// Jump, if grounded (runner level).
    Jump,
    /// Steer toward a world-space point (driving level).
    SteerTo(Vec2),
    /// Horizontal lane position to hold (collector level).
    Lane(f32),
    /// Advance past a start or instruction screen.
    Advance,
}

/// Readiness of the avatar toward new hazard reactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// Accepting input and collision reactions.
    Ready,
    /// Blinking through a stun; hazard contacts are ignored.
    Stunned {
        /// Blink ticks left before control returns.
        blinks_left: u8,
    },
}

/// Current steer order for the driving level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveTarget {
    /// Point the avatar heads for.
    pub dest: Vec2,
    /// Unit direction locked in when the order was given.
    pub dir: Vec2,
}

/// Player avatar state.
#[derive(Component, Debug)]
pub struct Player {
    /// Ready/Stunned state machine.
    pub state: PlayerState,
    /// Position restored after a stun.
    pub last_good_pos: Vec2,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Active steer order, if any.
    pub drive: Option<DriveTarget>,
    /// Lane x-position to hold, if the level uses lane input.
    pub lane_x: Option<f32>,
}

impl Player {
    /// Ready avatar with the given speed.
    #[must_use]
    pub const fn new(speed: f32) -> Self {
        Self {
            state: PlayerState::Ready,
            last_good_pos: Vec2::ZERO,
            speed,
            drive: None,
            lane_x: None,
        }
    }

    /// True while new hazard reactions may be processed.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.state, PlayerState::Ready)
    }

    /// Enters the stunned state with a full blink countdown.
    pub fn begin_stun(&mut self) {
        self.state = PlayerState::Stunned {
            blinks_left: STUN_BLINKS,
        };
        self.drive = None;
    }
}

/// Applies queued input commands to the avatar.
///
/// Steer orders are ignored while one is in progress or while stunned,
/// matching the original click handling; the facing flip rule is the same
/// as the route follower's.
pub fn apply_input_system(
    mut input: EventReader<InputCommand>,
    mut players: Query<(
        &mut Player,
        &Position,
        Option<&mut Jumper>,
        Option<&mut Facing>,
    )>,
) {
    for command in input.read() {
        let Ok((mut player, position, jumper, facing)) = players.get_single_mut() else {
            return;
        };
        match *command {
            InputCommand::Jump => {
                if player.is_ready() {
                    if let Some(mut jumper) = jumper {
                        jumper.try_jump(position.0.y);
                    }
                }
            }
            InputCommand::SteerTo(dest) => {
                if !player.is_ready() || player.drive.is_some() {
                    continue;
                }
                let dir = (dest - position.0).normalize_or_zero();
                if dir == Vec2::ZERO {
                    continue;
                }
                if let Some(mut facing) = facing {
                    let angle_deg = dir.y.atan2(dir.x).to_degrees();
                    facing.flip_x = true;
                    facing.flip_y = !(-90.0..=90.0).contains(&angle_deg);
                    facing.angle_deg = angle_deg;
                }
                player.drive = Some(DriveTarget { dest, dir });
            }
            InputCommand::Lane(x) => {
                player.lane_x = Some(x);
            }
            InputCommand::Advance => {}
        }
    }
}

/// Moves a driven avatar toward its steer target.
///
/// A hazard hit discards the active order via [`Player::begin_stun`], so a
/// stunned avatar stays put until it is steered again.
pub fn drive_player_system(
    clock: Res<VirtualClock>,
    mut players: Query<(&mut Player, &mut Position)>,
) {
    let dt = clock.dt();
    if dt <= 0.0 {
        return;
    }
    for (mut player, mut position) in &mut players {
        if !player.is_ready() {
            continue;
        }
        let Some(drive) = player.drive else {
            continue;
        };
        if position.0.distance(drive.dest) < DRIVE_STOP_DISTANCE {
            player.drive = None;
            continue;
        }
        let speed = player.speed;
        position.0 += drive.dir * speed * dt;
    }
}

/// Holds the avatar at the requested lane position.
pub fn lane_follow_system(mut players: Query<(&Player, &mut Position)>) {
    for (player, mut position) in &mut players {
        if !player.is_ready() {
            continue;
        }
        if let Some(x) = player.lane_x {
            position.0.x = x;
        }
    }
}

/// Records the avatar position as last-known-good while it is ready.
///
/// Runs before movement, so the stun restore returns the avatar to where
/// it stood on the frame before it entered the hazard.
pub fn record_last_good_system(mut players: Query<(&mut Player, &Position)>) {
    for (mut player, position) in &mut players {
        if player.is_ready() {
            player.last_good_pos = position.0;
        }
    }
}

/// Advances the blink-cycle countdown of a stunned avatar.
///
/// Each tick toggles opacity. The avatar snaps back to its last-known-good
/// position at the halfway tick (so a sustained overlap cannot carry it
/// deeper into the hazard) and again when the countdown completes, at which
/// point it returns to `Ready` at full opacity. Deliveries for a despawned
/// avatar are dropped.
pub fn blink_tick_system(
    clock: Res<VirtualClock>,
    mut timers: ResMut<TimerQueue>,
    mut fired: EventReader<TimerFired>,
    mut players: Query<(&mut Player, &mut Position, &mut Opacity)>,
) {
    for event in fired.read() {
        if event.action != TimerAction::BlinkTick {
            continue;
        }
        let Ok((mut player, mut position, mut opacity)) = players.get_mut(event.target) else {
            continue;
        };
        let PlayerState::Stunned { blinks_left } = player.state else {
            continue;
        };

        opacity.0 = if (opacity.0 - 1.0).abs() < f32::EPSILON {
            0.5
        } else {
            1.0
        };

        if blinks_left == STUN_BLINKS / 2 {
            position.0 = player.last_good_pos;
        }

        let remaining = blinks_left.saturating_sub(1);
        if remaining == 0 {
            position.0 = player.last_good_pos;
            opacity.0 = 1.0;
            player.state = PlayerState::Ready;
            log::debug!("stun complete for {:?}", event.target);
        } else {
            player.state = PlayerState::Stunned {
                blinks_left: remaining,
            };
            timers.schedule_in(
                &clock,
                stun_blink_interval(),
                event.target,
                TimerAction::BlinkTick,
            );
        }
    }
}
