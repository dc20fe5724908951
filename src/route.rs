//! Waypoint routes and the route follower.
//!
//! A [`Route`] is an ordered polyline an actor travels along at constant
//! speed, wrapping from the last waypoint back to the first unless the
//! follower is configured to despawn on arrival at the end. Followers can
//! pause for a delay at designated pause points (or at every waypoint) and
//! can orient their sprite to face the direction of travel, flipping
//! vertically when heading leftward so the sprite is never upside down.
//!
//! The per-frame decision is computed by [`RouteFollower::plan`], a pure
//! function of follower state, position, and the frame delta; the
//! [`follow_route_system`] merely applies the resulting [`StepPlan`] to the
//! world. This keeps every branch of the steering behaviour testable
//! without an ECS world.

use bevy_ecs::prelude::*;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::{TimerAction, TimerFired, TimerQueue, VirtualClock};
use crate::components::{Facing, Hitbox, MoveSpeed, Position};
use crate::{ARRIVAL_THRESHOLD, DEFAULT_FOLLOW_SPEED};

/// Error raised when route authoring data is malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    /// A route needs at least one waypoint; motion needs two.
    #[error("a route must contain at least one waypoint")]
    Empty,
}

/// An ordered, non-empty sequence of waypoints.
///
/// A single-point route is accepted but degenerate: a follower standing on
/// it idles forever at distance zero. Meaningful motion needs two or more
/// points.
///
/// # Examples
///
/// ```
/// use glam::Vec2;
/// use scheldt::route::{Route, RouteError};
///
/// let route = Route::new(vec![Vec2::ZERO, Vec2::new(10.0, 0.0)]).unwrap();
/// assert_eq!(route.len(), 2);
/// assert_eq!(Route::new(vec![]), Err(RouteError::Empty));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    points: Vec<Vec2>,
}

impl Route {
    /// Builds a route from waypoints, rejecting an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Empty`] when `points` contains no waypoints.
    pub fn new(points: Vec<Vec2>) -> Result<Self, RouteError> {
        if points.is_empty() {
            return Err(RouteError::Empty);
        }
        Ok(Self { points })
    }

    /// Builds a route from raw coordinate pairs, as levels author them.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Empty`] when `points` is empty.
    pub fn from_coords(points: &[(f32, f32)]) -> Result<Self, RouteError> {
        Self::new(points.iter().map(|&(x, y)| Vec2::new(x, y)).collect())
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; constructing an empty route is an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Waypoint at `index`, wrapping modulo the route length.
    #[must_use]
    pub fn point(&self, index: usize) -> Vec2 {
        // Length is non-zero by construction.
        self.points[index % self.points.len()]
    }

    /// All waypoints in order.
    #[must_use]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }
}

/// Authoring-time configuration for a [`RouteFollower`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowConfig {
    /// Index of the first waypoint to head for.
    pub start_index: usize,
    /// Linear speed in units per second, unless overridden by
    /// [`MoveSpeed`] on the actor.
    pub speed: f32,
    /// Rotate the sprite to face travel and flip it past ±90°.
    pub control_facing: bool,
    /// Terminate the actor upon arrival at the final waypoint.
    pub despawn_on_last: bool,
    /// Seconds to hold at a pause point; zero disables pausing.
    pub pause_delay: f32,
    /// Explicit pause points. When `None` and `pause_delay` is positive,
    /// the follower pauses at every waypoint arrival instead.
    pub pause_points: Option<Vec<Vec2>>,
    /// Vertical hitbox offset, negated while the sprite is flipped.
    pub hitbox_offset_y: f32,
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self {
            start_index: 0,
            speed: DEFAULT_FOLLOW_SPEED,
            control_facing: true,
            despawn_on_last: false,
            pause_delay: 0.0,
            pause_points: None,
            hitbox_offset_y: 0.0,
        }
    }
}

/// Facing update produced when the follower turns toward a new waypoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacingChange {
    /// New sprite rotation in degrees.
    pub angle_deg: f32,
    /// Whether the sprite must be vertically flipped.
    pub flip_y: bool,
    /// Signed vertical hitbox offset matching the flip state.
    pub hitbox_offset_y: f32,
}

/// Movement notice carried on [`FollowerMoved`], mirroring the follower's
/// per-move callback in the original design.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveNotice {
    /// Waypoint most recently departed from, if any yet.
    pub last_target: Option<Vec2>,
    /// Waypoint currently travelled toward.
    pub target: Vec2,
    /// Facing angle in degrees at the time of the move.
    pub angle_deg: f32,
}

/// Everything one frame of following asks the world to do.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepPlan {
    /// Translation to apply this frame.
    pub displacement: Vec2,
    /// A pause began; schedule the resume timer for the pause delay.
    pub pause_started: bool,
    /// The actor reached the final waypoint and must be despawned.
    pub terminate: bool,
    /// Facing/flip update to mirror onto the sprite and hitbox.
    pub facing: Option<FacingChange>,
    /// Move notification to emit, absent while paused or terminating.
    pub moved: Option<MoveNotice>,
}

/// Per-actor route following state.
#[derive(Component, Debug, Clone)]
pub struct RouteFollower {
    route: Route,
    config: FollowConfig,
    target_index: usize,
    last_target: Option<Vec2>,
    paused: bool,
    last_pause_point: Option<Vec2>,
}

impl RouteFollower {
    /// Creates a follower heading for `config.start_index` on `route`.
    #[must_use]
    pub fn new(route: Route, config: FollowConfig) -> Self {
        let target_index = config.start_index % route.len();
        Self {
            route,
            config,
            target_index,
            last_target: None,
            paused: false,
            last_pause_point: None,
        }
    }

    /// Follower with default configuration at the given speed.
    #[must_use]
    pub fn with_speed(route: Route, speed: f32) -> Self {
        Self::new(
            route,
            FollowConfig {
                speed,
                ..FollowConfig::default()
            },
        )
    }

    /// Index of the waypoint currently travelled toward.
    #[must_use]
    pub const fn target_index(&self) -> usize {
        self.target_index
    }

    /// Waypoint currently travelled toward.
    #[must_use]
    pub fn current_target(&self) -> Vec2 {
        self.route.point(self.target_index)
    }

    /// True while the follower holds at a pause point.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Authoring configuration this follower was built with.
    #[must_use]
    pub const fn config(&self) -> &FollowConfig {
        &self.config
    }

    /// Resume movement after a pause delay elapsed.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Computes one frame of movement.
    ///
    /// Pure with respect to the world: the caller applies the returned
    /// [`StepPlan`]. A non-positive `dt` produces an empty plan and mutates
    /// nothing, so stepping with zero elapsed time is idempotent.
    pub fn plan(
        &mut self,
        position: Vec2,
        current_angle: f32,
        speed_override: Option<f32>,
        dt: f32,
    ) -> StepPlan {
        let mut plan = StepPlan::default();
        if dt <= 0.0 {
            return plan;
        }

        plan.pause_started = self.check_pause_points(position);

        let target = self.current_target();
        if position.distance(target) <= ARRIVAL_THRESHOLD {
            if self.config.despawn_on_last && self.target_index == self.route.len() - 1 {
                plan.terminate = true;
                return plan;
            }
            self.last_target = Some(target);
            self.target_index = (self.target_index + 1) % self.route.len();
            if self.config.control_facing {
                plan.facing = Some(self.turn_toward(position));
            }
        }

        if self.paused {
            return plan;
        }

        let angle_deg = plan.facing.map_or(current_angle, |f| f.angle_deg);
        let target = self.current_target();
        plan.moved = Some(MoveNotice {
            last_target: self.last_target,
            target,
            angle_deg,
        });

        let speed = speed_override.unwrap_or(self.config.speed);
        let to_target = target - position;
        let step = speed * dt;
        // Clamp to the target so one oversized frame cannot shoot past the
        // waypoint it was heading for.
        plan.displacement = if to_target.length() <= step {
            to_target
        } else {
            to_target.normalize_or_zero() * step
        };
        plan
    }

    /// Checks the pause-point set, marking the follower paused on a hit.
    ///
    /// The most recently triggered point is remembered and skipped so the
    /// same point never re-pauses on consecutive checks.
    fn check_pause_points(&mut self, position: Vec2) -> bool {
        if self.paused || self.config.pause_delay <= 0.0 {
            return false;
        }
        let current_target = self.current_target();
        let hit = {
            let points: &[Vec2] = self
                .config
                .pause_points
                .as_deref()
                .unwrap_or(std::slice::from_ref(&current_target));
            points.iter().copied().find(|&point| {
                self.last_pause_point != Some(point)
                    && position.distance(point) <= ARRIVAL_THRESHOLD
            })
        };
        if let Some(point) = hit {
            self.paused = true;
            self.last_pause_point = Some(point);
            return true;
        }
        false
    }

    /// Facing update for the segment from `position` to the new target.
    fn turn_toward(&self, position: Vec2) -> FacingChange {
        let dir = (self.current_target() - position).normalize_or_zero();
        let angle_deg = dir.y.atan2(dir.x).to_degrees();
        let flip_y = !(-90.0..=90.0).contains(&angle_deg);
        let hitbox_offset_y = if flip_y {
            -self.config.hitbox_offset_y
        } else {
            self.config.hitbox_offset_y
        };
        FacingChange {
            angle_deg,
            flip_y,
            hitbox_offset_y,
        }
    }
}

/// Emitted every frame a follower moves, mirroring the original per-move
/// callback: previous target, new target, and the facing angle.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct FollowerMoved {
    /// The moving actor.
    pub entity: Entity,
    /// Notice payload.
    pub notice: MoveNotice,
}

/// Emitted exactly once when a despawn-on-last follower reaches the final
/// waypoint and is removed.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteCompleted {
    /// The terminated actor.
    pub entity: Entity,
}

/// Advances every active follower by one frame.
pub fn follow_route_system(
    mut commands: Commands,
    clock: Res<VirtualClock>,
    mut timers: ResMut<TimerQueue>,
    mut moved: EventWriter<FollowerMoved>,
    mut completed: EventWriter<RouteCompleted>,
    mut followers: Query<(
        Entity,
        &mut RouteFollower,
        &mut Position,
        Option<&MoveSpeed>,
        Option<&mut Facing>,
        Option<&mut Hitbox>,
    )>,
) {
    for (entity, mut follower, mut position, speed, facing, hitbox) in &mut followers {
        let current_angle = facing.as_ref().map_or(0.0, |f| f.angle_deg);
        let plan = follower.plan(position.0, current_angle, speed.map(|s| s.0), clock.dt());

        if plan.terminate {
            log::debug!("follower {entity:?} completed its route");
            commands.entity(entity).despawn();
            completed.send(RouteCompleted { entity });
            continue;
        }
        if plan.pause_started {
            timers.schedule_in(
                &clock,
                follower.config().pause_delay,
                entity,
                TimerAction::ResumeFollower,
            );
        }
        if let Some(change) = plan.facing {
            if let Some(mut facing) = facing {
                facing.angle_deg = change.angle_deg;
                facing.flip_y = change.flip_y;
            }
            if let Some(mut hitbox) = hitbox {
                hitbox.offset.y = change.hitbox_offset_y;
            }
        }
        if let Some(notice) = plan.moved {
            moved.send(FollowerMoved { entity, notice });
            position.0 += plan.displacement;
        }
    }
}

/// Un-pauses followers whose pause delay elapsed.
///
/// Deliveries for despawned actors are dropped.
pub fn resume_followers_system(
    mut fired: EventReader<TimerFired>,
    mut followers: Query<&mut RouteFollower>,
) {
    for event in fired.read() {
        if event.action != TimerAction::ResumeFollower {
            continue;
        }
        if let Ok(mut follower) = followers.get_mut(event.target) {
            follower.resume();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_route() -> Route {
        Route::from_coords(&[(0.0, 0.0), (10.0, 0.0)]).expect("route")
    }

    #[test]
    fn zero_dt_is_a_no_op() {
        let mut follower = RouteFollower::with_speed(straight_route(), 10.0);
        let before_index = follower.target_index();
        let plan = follower.plan(Vec2::ZERO, 0.0, None, 0.0);
        assert_eq!(plan, StepPlan::default());
        assert_eq!(follower.target_index(), before_index);
        assert!(!follower.is_paused());
    }

    #[test]
    fn arrival_wraps_target_index() {
        let mut follower = RouteFollower::with_speed(straight_route(), 10.0);
        // Standing on waypoint 0: the follower advances to waypoint 1.
        let plan = follower.plan(Vec2::ZERO, 0.0, None, 0.1);
        assert_eq!(follower.target_index(), 1);
        assert!(plan.moved.is_some());
        // Standing on waypoint 1 wraps back to 0.
        follower.plan(Vec2::new(10.0, 0.0), 0.0, None, 0.1);
        assert_eq!(follower.target_index(), 0);
    }

    #[test]
    fn displacement_clamps_to_target() {
        let mut follower = RouteFollower::with_speed(straight_route(), 1000.0);
        let plan = follower.plan(Vec2::new(5.0, 0.0), 0.0, None, 1.0);
        assert_eq!(plan.displacement, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn speed_override_takes_precedence() {
        let mut follower = RouteFollower::with_speed(straight_route(), 1.0);
        let plan = follower.plan(Vec2::new(5.0, 0.0), 0.0, Some(2.0), 1.0);
        assert_eq!(plan.displacement, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn leftward_travel_flips_vertically() {
        let route = Route::from_coords(&[(10.0, 0.0), (0.0, 0.0)]).expect("route");
        let mut follower = RouteFollower::new(route, FollowConfig::default());
        // Standing on the first waypoint turns the follower toward the
        // second, which lies to the left.
        let plan = follower.plan(Vec2::new(10.0, 0.0), 0.0, None, 0.1);
        let facing = plan.facing.expect("facing change");
        assert!(facing.flip_y);
        assert!(facing.angle_deg.abs() > 90.0);
    }

    #[test]
    fn rightward_travel_clears_flip() {
        let mut follower = RouteFollower::new(straight_route(), FollowConfig::default());
        let plan = follower.plan(Vec2::ZERO, 0.0, None, 0.1);
        let facing = plan.facing.expect("facing change");
        assert!(!facing.flip_y);
        assert!(facing.angle_deg.abs() <= 90.0);
    }

    #[test]
    fn pause_suppresses_movement_but_not_index_advance() {
        let config = FollowConfig {
            pause_delay: 2.0,
            control_facing: false,
            ..FollowConfig::default()
        };
        let mut follower = RouteFollower::new(straight_route(), config);
        let plan = follower.plan(Vec2::ZERO, 0.0, None, 0.1);
        assert!(plan.pause_started);
        assert!(follower.is_paused());
        assert!(plan.moved.is_none());
        assert_eq!(plan.displacement, Vec2::ZERO);
        // Arrival handling still ran while the pause began.
        assert_eq!(follower.target_index(), 1);
    }

    #[test]
    fn same_pause_point_does_not_retrigger() {
        let config = FollowConfig {
            pause_delay: 1.0,
            pause_points: Some(vec![Vec2::ZERO]),
            control_facing: false,
            ..FollowConfig::default()
        };
        let mut follower = RouteFollower::new(straight_route(), config);
        assert!(follower.plan(Vec2::ZERO, 0.0, None, 0.1).pause_started);
        follower.resume();
        // Still standing within the threshold of the same point.
        assert!(!follower.plan(Vec2::ZERO, 0.0, None, 0.1).pause_started);
    }

    #[test]
    fn despawn_on_last_terminates_once() {
        let route = Route::from_coords(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]).expect("route");
        let config = FollowConfig {
            despawn_on_last: true,
            control_facing: false,
            start_index: 2,
            ..FollowConfig::default()
        };
        let mut follower = RouteFollower::new(route, config);
        let plan = follower.plan(Vec2::new(10.0, 10.0), 0.0, None, 0.1);
        assert!(plan.terminate);
        assert!(plan.moved.is_none());
        assert_eq!(plan.displacement, Vec2::ZERO);
    }
}
