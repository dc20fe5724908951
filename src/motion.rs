//! Straight-line movers and the runner's jump kinematics.
//!
//! Everything here is deliberately simple: obstacles and falling snacks
//! travel in a fixed direction until a despawn strip removes them, and the
//! runner level needs only a vertical velocity with gravity. Anything
//! richer belongs to [`crate::route`].

use bevy_ecs::prelude::*;
use glam::Vec2;
use serde::Serialize;

use crate::clock::VirtualClock;
use crate::components::Position;

/// Constant-direction movement, used by spawned obstacles and snacks.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearMover {
    /// Unit direction of travel.
    pub direction: Vec2,
    /// Speed in units per second.
    pub speed: f32,
}

impl LinearMover {
    /// Mover heading left across the screen.
    #[must_use]
    pub const fn leftward(speed: f32) -> Self {
        Self {
            direction: Vec2::new(-1.0, 0.0),
            speed,
        }
    }

    /// Mover falling straight down (y grows downward).
    #[must_use]
    pub const fn falling(speed: f32) -> Self {
        Self {
            direction: Vec2::new(0.0, 1.0),
            speed,
        }
    }
}

/// Vertical jump state for the runner level.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Jumper {
    /// Current vertical velocity, positive downward.
    pub vy: f32,
    /// Ground line the actor rests on.
    pub ground_y: f32,
    /// Initial upward velocity of a jump.
    pub jump_force: f32,
    /// Downward acceleration in units per second squared.
    pub gravity: f32,
}

impl Jumper {
    /// Jumper resting on `ground_y` with the original tuning.
    #[must_use]
    pub const fn on_ground(ground_y: f32) -> Self {
        Self {
            vy: 0.0,
            ground_y,
            jump_force: 700.0,
            gravity: 1000.0,
        }
    }

    /// True while the actor rests on the ground line.
    #[must_use]
    pub fn grounded(&self, y: f32) -> bool {
        y >= self.ground_y && self.vy >= 0.0
    }

    /// Launches a jump; no-op while airborne.
    pub fn try_jump(&mut self, y: f32) -> bool {
        if self.grounded(y) {
            self.vy = -self.jump_force;
            return true;
        }
        false
    }
}

/// Applies linear motion to every [`LinearMover`].
pub fn linear_mover_system(
    clock: Res<VirtualClock>,
    mut movers: Query<(&LinearMover, &mut Position)>,
) {
    let dt = clock.dt();
    if dt <= 0.0 {
        return;
    }
    for (mover, mut position) in &mut movers {
        position.0 += mover.direction * mover.speed * dt;
    }
}

/// Integrates gravity and lands jumpers back on their ground line.
pub fn jumper_system(clock: Res<VirtualClock>, mut jumpers: Query<(&mut Jumper, &mut Position)>) {
    let dt = clock.dt();
    if dt <= 0.0 {
        return;
    }
    for (mut jumper, mut position) in &mut jumpers {
        jumper.vy += jumper.gravity * dt;
        position.0.y += jumper.vy * dt;
        if position.0.y >= jumper.ground_y {
            position.0.y = jumper.ground_y;
            jumper.vy = 0.0;
        }
    }
}
