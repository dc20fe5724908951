//! ECS component types shared between levels.
//!
//! Level-specific state lives with its module (`RouteFollower` in
//! [`crate::route`], `Player` in [`crate::player`]); this module holds the
//! spatial and presentation components every actor carries.

use bevy_ecs::prelude::*;
use glam::Vec2;
use serde::Serialize;

/// World-space position of an actor.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position(pub Vec2);

impl Position {
    /// Convenience constructor from raw coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

/// Orientation state the host engine mirrors onto the sprite.
///
/// `angle_deg` follows the atan2 convention: 0° points right, positive
/// angles turn clockwise in screen space (y grows downward).
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Facing {
    /// Rotation applied to the sprite, in degrees.
    pub angle_deg: f32,
    /// Horizontal mirror flag.
    pub flip_x: bool,
    /// Vertical mirror flag, set when travelling leftward.
    pub flip_y: bool,
}

/// Axis-aligned collision shape, expressed relative to [`Position`].
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hitbox {
    /// Half extents of the box.
    pub half_extents: Vec2,
    /// Offset of the box centre from the actor position.
    pub offset: Vec2,
}

impl Hitbox {
    /// Centred box with the given full width and height.
    #[must_use]
    pub const fn centered(width: f32, height: f32) -> Self {
        Self {
            half_extents: Vec2::new(width / 2.0, height / 2.0),
            offset: Vec2::ZERO,
        }
    }

    /// World-space centre of the box for an actor at `position`.
    #[must_use]
    pub fn center(&self, position: Vec2) -> Vec2 {
        position + self.offset
    }
}

/// Per-actor speed override, in units per second.
///
/// When present it takes precedence over the speed configured on the
/// actor's route.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoveSpeed(pub f32);

/// Uniform sprite scale, mutated by the collector level's grow/shrink
/// reactions.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpriteScale(pub Vec2);

/// Sprite opacity in `0.0..=1.0`; toggled while the player blinks.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Opacity(pub f32);

impl Default for Opacity {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Marker for entities that probe for contacts each frame.
///
/// Only the player avatar and despawn strips carry this; everything else is
/// a passive collision target.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct SensesContacts;

/// Set once an actor has hit the player, so a dodged-versus-hit obstacle is
/// scored correctly when it leaves the playfield.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Struck(pub bool);
