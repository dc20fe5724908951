//! Virtual time and one-shot timers.
//!
//! All delays in the game (pause-then-resume at a waypoint, blink cycles,
//! spawner re-arms, the ferry hand-off) go through [`TimerQueue`] against
//! the [`VirtualClock`] instead of real time. A simulation therefore runs
//! identically whether it is stepped at 60 Hz by the host engine or in a
//! tight loop by a test.
//!
//! Timers are fire and forget: a fired entry names a target entity and a
//! [`TimerAction`], and the handling system drops the delivery silently
//! when the target no longer exists. Destroying an actor thus cancels its
//! outstanding timers without any bookkeeping.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::*;
use ordered_float::OrderedFloat;

/// Monotonic simulated time, advanced only by `Sim::step`.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct VirtualClock {
    now: f64,
    dt: f32,
}

impl VirtualClock {
    /// Advance the clock by one frame of `dt` seconds.
    ///
    /// Negative deltas are ignored; time never runs backwards.
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.now += f64::from(dt);
        self.dt = dt;
    }

    /// Seconds elapsed since the simulation started.
    #[must_use]
    pub const fn now(&self) -> f64 {
        self.now
    }

    /// Delta of the frame currently being stepped.
    #[must_use]
    pub const fn dt(&self) -> f32 {
        self.dt
    }
}

/// What a fired timer asks its target entity to do.
///
/// A closed enumeration instead of boxed callbacks: handlers stay
/// statically checkable and cannot close over state of a destroyed actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerAction {
    /// Un-pause a route follower that stopped at a pause point.
    ResumeFollower,
    /// Advance a stunned player's blink cycle by one tick.
    BlinkTick,
    /// Let a periodic spawner emit its next wave and re-arm.
    SpawnWave,
    /// Board a waiting passenger onto the ferry, if both still exist.
    FerryHandOff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TimerEntry {
    due: OrderedFloat<f64>,
    seq: u64,
    target: Entity,
    action: TimerAction,
}

impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse so the earliest deadline wins.
        // seq breaks ties FIFO.
        (other.due, other.seq).cmp(&(self.due, self.seq))
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Pending one-shot timers ordered by deadline.
#[derive(Resource, Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<TimerEntry>,
    next_seq: u64,
}

impl TimerQueue {
    /// Schedule `action` against `target`, `delay` seconds from now.
    pub fn schedule_in(
        &mut self,
        clock: &VirtualClock,
        delay: f32,
        target: Entity,
        action: TimerAction,
    ) {
        let due = clock.now() + f64::from(delay.max(0.0));
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(TimerEntry {
            due: OrderedFloat(due),
            seq,
            target,
            action,
        });
    }

    /// Pop the next entry whose deadline has passed, if any.
    pub fn pop_due(&mut self, now: f64) -> Option<(Entity, TimerAction)> {
        let head = self.heap.peek()?;
        if head.due.into_inner() > now {
            return None;
        }
        self.heap.pop().map(|e| (e.target, e.action))
    }

    /// Number of pending entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True when nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// A timer that came due this frame.
///
/// Consumers must tolerate a dead `target` and drop the event.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    /// Entity the timer was scheduled against.
    pub target: Entity,
    /// Requested action.
    pub action: TimerAction,
}

/// Pops every due timer and re-emits it as a [`TimerFired`] event.
///
/// Runs first in the frame so handlers observe the delivery before any
/// movement happens.
pub fn fire_due_timers_system(
    clock: Res<VirtualClock>,
    mut queue: ResMut<TimerQueue>,
    mut fired: EventWriter<TimerFired>,
) {
    while let Some((target, action)) = queue.pop_due(clock.now()) {
        log::trace!("timer fired: {action:?} for {target:?}");
        fired.send(TimerFired { target, action });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_pop_in_deadline_order() {
        let mut queue = TimerQueue::default();
        let clock = VirtualClock::default();
        let e = Entity::from_raw(1);
        queue.schedule_in(&clock, 2.0, e, TimerAction::SpawnWave);
        queue.schedule_in(&clock, 1.0, e, TimerAction::BlinkTick);

        assert_eq!(queue.pop_due(5.0), Some((e, TimerAction::BlinkTick)));
        assert_eq!(queue.pop_due(5.0), Some((e, TimerAction::SpawnWave)));
        assert!(queue.pop_due(5.0).is_none());
    }

    #[test]
    fn equal_deadlines_fire_fifo() {
        let mut queue = TimerQueue::default();
        let clock = VirtualClock::default();
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        queue.schedule_in(&clock, 1.0, a, TimerAction::ResumeFollower);
        queue.schedule_in(&clock, 1.0, b, TimerAction::ResumeFollower);

        assert_eq!(queue.pop_due(1.0), Some((a, TimerAction::ResumeFollower)));
        assert_eq!(queue.pop_due(1.0), Some((b, TimerAction::ResumeFollower)));
    }

    #[test]
    fn future_timers_stay_queued() {
        let mut queue = TimerQueue::default();
        let clock = VirtualClock::default();
        queue.schedule_in(&clock, 3.0, Entity::from_raw(7), TimerAction::SpawnWave);

        assert!(queue.pop_due(2.999).is_none());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn clock_ignores_negative_deltas() {
        let mut clock = VirtualClock::default();
        clock.advance(1.0);
        clock.advance(-5.0);
        assert!((clock.now() - 1.0).abs() < f64::EPSILON);
        assert!(clock.dt().abs() < f32::EPSILON);
    }
}
