//! # Timer Scheduler
//!
//! Single-threaded scheduler for every delayed or repeating game event.
//!
//! Timers are entries in a min-heap keyed by due time. Nothing fires on its own:
//! the game loop calls [`Scheduler::pop_due`] with the current game time and
//! handles whatever comes out. Cancelling a timer removes it from the pending
//! set, and cancelled entries are dropped when they reach the top of the heap.

use crate::game::CometId;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::time::Duration;

/// Handle returned when a timer is scheduled; used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(u64);

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimerKind {
    /// Periodic check whether a comet is due
    CometPoll,
    /// End of a comet's flight
    CometExpiry(CometId),
    /// Spawn portal lifetime is over
    PortalExpiry,
    /// Backup removal of the spawn portal
    PortalForcedRemoval,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ScheduledTask {
    due: Duration,
    handle: TimerHandle,
    kind: TimerKind,
}

/// Min-heap of pending timers.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Reverse<ScheduledTask>>,
    pending: HashSet<TimerHandle>,
    next_handle: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `kind` to fire at the absolute game time `due`.
    pub fn schedule_at(&mut self, due: Duration, kind: TimerKind) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.insert(handle);
        self.queue.push(Reverse(ScheduledTask { due, handle, kind }));
        handle
    }

    /// Schedules `kind` to fire `delay` after `now`.
    pub fn schedule_after(&mut self, now: Duration, delay: Duration, kind: TimerKind) -> TimerHandle {
        self.schedule_at(now + delay, kind)
    }

    /// Cancels a timer. Returns whether it was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.pending.remove(&handle)
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.contains(&handle)
    }

    /// Number of timers that have neither fired nor been cancelled.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Due time of the earliest pending timer.
    pub fn next_due(&mut self) -> Option<Duration> {
        self.discard_cancelled();
        self.queue.peek().map(|Reverse(task)| task.due)
    }

    /// Removes and returns the earliest timer due at or before `now`.
    ///
    /// Timers with equal due times come out in scheduling order.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use starmaze::{Scheduler, TimerKind};
    ///
    /// let mut scheduler = Scheduler::new();
    /// let late = scheduler.schedule_at(Duration::from_secs(10), TimerKind::PortalExpiry);
    /// let early = scheduler.schedule_at(Duration::from_secs(5), TimerKind::CometPoll);
    ///
    /// assert_eq!(scheduler.pop_due(Duration::from_secs(4)), None);
    /// assert_eq!(
    ///     scheduler.pop_due(Duration::from_secs(12)),
    ///     Some((early, TimerKind::CometPoll))
    /// );
    /// assert!(scheduler.cancel(late));
    /// assert_eq!(scheduler.pop_due(Duration::from_secs(12)), None);
    /// ```
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerHandle, TimerKind)> {
        self.discard_cancelled();
        match self.queue.peek() {
            Some(Reverse(task)) if task.due <= now => {}
            _ => return None,
        }

        let Reverse(task) = self.queue.pop()?;
        self.pending.remove(&task.handle);
        Some((task.handle, task.kind))
    }

    fn discard_cancelled(&mut self) {
        while let Some(Reverse(task)) = self.queue.peek() {
            if self.pending.contains(&task.handle) {
                break;
            }
            self.queue.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::new_comet_id;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_timers_fire_in_due_order() {
        let mut scheduler = Scheduler::new();
        let comet = new_comet_id();
        scheduler.schedule_at(secs(30), TimerKind::PortalExpiry);
        scheduler.schedule_at(secs(10), TimerKind::CometPoll);
        scheduler.schedule_at(secs(20), TimerKind::CometExpiry(comet));

        let fired: Vec<TimerKind> =
            std::iter::from_fn(|| scheduler.pop_due(secs(60)).map(|(_, kind)| kind)).collect();
        assert_eq!(
            fired,
            vec![
                TimerKind::CometPoll,
                TimerKind::CometExpiry(comet),
                TimerKind::PortalExpiry,
            ]
        );
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_equal_due_times_keep_insertion_order() {
        let mut scheduler = Scheduler::new();
        let first = scheduler.schedule_at(secs(5), TimerKind::PortalForcedRemoval);
        let second = scheduler.schedule_at(secs(5), TimerKind::CometPoll);
        assert_eq!(scheduler.pop_due(secs(5)).map(|(h, _)| h), Some(first));
        assert_eq!(scheduler.pop_due(secs(5)).map(|(h, _)| h), Some(second));
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule_after(secs(1), secs(2), TimerKind::PortalExpiry);
        assert!(scheduler.is_pending(handle));
        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));
        assert!(!scheduler.is_pending(handle));
        assert_eq!(scheduler.pop_due(secs(100)), None);
        assert_eq!(scheduler.next_due(), None);
    }

    #[test]
    fn test_fired_timer_is_no_longer_pending() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule_at(secs(3), TimerKind::CometPoll);
        assert_eq!(scheduler.next_due(), Some(secs(3)));
        assert!(scheduler.pop_due(secs(3)).is_some());
        assert!(!scheduler.is_pending(handle));
        assert!(!scheduler.cancel(handle));
    }
}
