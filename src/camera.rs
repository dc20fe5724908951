//! Camera focus clamped to the level background.
//!
//! The host engine owns the real camera; this module only computes the
//! focus point it should centre on, following the player and clamping so
//! the view never leaves the background rectangle.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::Position;
use crate::player::Player;

/// Extents the focus point must stay inside.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct CameraBounds {
    /// Size of the level background in world units.
    pub world: Vec2,
    /// Size of the visible screen in world units.
    pub screen: Vec2,
}

impl CameraBounds {
    /// Clamps a desired focus point to the background rectangle.
    #[must_use]
    pub fn clamp(&self, focus: Vec2) -> Vec2 {
        let half = self.screen / 2.0;
        Vec2::new(
            focus.x.clamp(half.x, self.world.x - half.x),
            focus.y.clamp(half.y, self.world.y - half.y),
        )
    }
}

/// Point the host camera should centre on this frame.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraFocus(pub Vec2);

/// Follows the player, keeping the view inside the level.
pub fn camera_follow_system(
    bounds: Option<Res<CameraBounds>>,
    focus: Option<ResMut<CameraFocus>>,
    player: Query<&Position, With<Player>>,
) {
    let (Some(bounds), Some(mut focus)) = (bounds, focus) else {
        return;
    };
    if let Ok(position) = player.get_single() {
        focus.0 = bounds.clamp(position.0);
    }
}
