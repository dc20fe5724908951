//! Polygonal trigger zones.
//!
//! A zone is a static polygon the level author draws over the background.
//! One-shot zones (finish lines, scene exits) fire on the first qualifying
//! entry and never again; sound zones hold a "currently playing" flag that
//! the host clears with a [`SoundFinished`] notice, so a looping ambience
//! cannot pile up on itself. Entry detection is edge-triggered: the player
//! must leave a re-entrant zone before it can fire again.

use bevy_ecs::prelude::*;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::Position;
use crate::effects::{SceneId, SceneRequest, SoundFinished, SoundId, SoundRequest};
use crate::player::Player;

/// A simple closed polygon in world space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<Vec2>,
}

impl Polygon {
    /// Builds a polygon from its vertices in order.
    #[must_use]
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    /// Builds a polygon from raw coordinate pairs, as levels author them.
    #[must_use]
    pub fn from_coords(coords: &[(f32, f32)]) -> Self {
        Self::new(coords.iter().map(|&(x, y)| Vec2::new(x, y)).collect())
    }

    /// Even-odd point-in-polygon test.
    ///
    /// Polygons with fewer than three vertices contain nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use glam::Vec2;
    /// use scheldt::trigger::Polygon;
    ///
    /// let square = Polygon::from_coords(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
    /// assert!(square.contains(Vec2::new(5.0, 5.0)));
    /// assert!(!square.contains(Vec2::new(15.0, 5.0)));
    /// ```
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[j];
            if (a.y > point.y) != (b.y > point.y) {
                let t = (point.y - a.y) / (b.y - a.y);
                if point.x < a.x + t * (b.x - a.x) {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

/// What entering a zone does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEffect {
    /// Transition to another scene. Always one-shot: the scene is torn
    /// down, so nothing further can fire.
    Scene(SceneId),
    /// Play a clip, debounced until the host reports it finished.
    Sound(SoundId),
}

/// A polygon tied to an entry effect.
#[derive(Component, Debug, Clone)]
pub struct TriggerZone {
    polygon: Polygon,
    effect: TriggerEffect,
    fired: bool,
    inside: bool,
    sound_playing: bool,
}

impl TriggerZone {
    /// Zone firing `effect` when the player enters `polygon`.
    #[must_use]
    pub const fn new(polygon: Polygon, effect: TriggerEffect) -> Self {
        Self {
            polygon,
            effect,
            fired: false,
            inside: false,
            sound_playing: false,
        }
    }

    /// The zone's effect.
    #[must_use]
    pub const fn effect(&self) -> TriggerEffect {
        self.effect
    }

    /// True once a one-shot zone has fired.
    #[must_use]
    pub const fn fired(&self) -> bool {
        self.fired
    }
}

/// Fires zones the player entered this frame.
pub fn trigger_zone_system(
    players: Query<&Position, With<Player>>,
    mut zones: Query<&mut TriggerZone>,
    mut sounds: EventWriter<SoundRequest>,
    mut scenes: EventWriter<SceneRequest>,
) {
    let Ok(position) = players.get_single() else {
        return;
    };
    for mut zone in &mut zones {
        let now_inside = zone.polygon.contains(position.0);
        let entered = now_inside && !zone.inside;
        zone.inside = now_inside;
        if !entered {
            continue;
        }
        match zone.effect {
            TriggerEffect::Scene(scene) => {
                if !zone.fired {
                    zone.fired = true;
                    log::info!("trigger zone requests scene {scene:?}");
                    scenes.send(SceneRequest(scene));
                }
            }
            TriggerEffect::Sound(sound) => {
                if !zone.sound_playing {
                    zone.sound_playing = true;
                    sounds.send(SoundRequest { sound, volume: 0.8 });
                }
            }
        }
    }
}

/// Clears the debounce flag of sound zones whose clip finished.
pub fn sound_finished_system(
    mut notices: EventReader<SoundFinished>,
    mut zones: Query<&mut TriggerZone>,
) {
    for notice in notices.read() {
        for mut zone in &mut zones {
            if zone.effect == TriggerEffect::Sound(notice.0) {
                zone.sound_playing = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_polygons_contain_nothing() {
        let line = Polygon::from_coords(&[(0.0, 0.0), (10.0, 0.0)]);
        assert!(!line.contains(Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn concave_polygon_containment() {
        // An L-shape; the notch is outside.
        let shape = Polygon::from_coords(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 4.0),
            (4.0, 4.0),
            (4.0, 10.0),
            (0.0, 10.0),
        ]);
        assert!(shape.contains(Vec2::new(2.0, 8.0)));
        assert!(shape.contains(Vec2::new(8.0, 2.0)));
        assert!(!shape.contains(Vec2::new(8.0, 8.0)));
    }
}
