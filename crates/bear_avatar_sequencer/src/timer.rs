// SPDX-License-Identifier: MIT OR Apache-2.0
//! Virtual-clock timer queue.

use std::collections::BTreeMap;
use std::time::Duration;

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    /// Timer handle
    pub id: TimerId,
    /// Scheduled due time
    pub due: Duration,
    /// Timeline generation that owns the timer
    pub generation: u64,
    /// Step index within that timeline
    pub step: usize,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    generation: u64,
    step: usize,
}

/// Pending timers ordered by due time, then by scheduling order
#[derive(Debug, Default)]
pub struct TimerQueue {
    pending: BTreeMap<(Duration, TimerId), Pending>,
    next_id: u64,
}

impl TimerQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a step of `generation` at absolute time `due`
    pub fn schedule(&mut self, due: Duration, generation: u64, step: usize) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert((due, id), Pending { generation, step });
        id
    }

    /// Remove every timer owned by `generation`; returns how many were removed
    pub fn cancel_generation(&mut self, generation: u64) -> usize {
        let before = self.pending.len();
        self.pending.retain(|_, p| p.generation != generation);
        before - self.pending.len()
    }

    /// Remove every timer; returns how many were removed
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    /// Pop the earliest timer due at or before `now`
    pub fn pop_due(&mut self, now: Duration) -> Option<Fired> {
        let entry = self.pending.first_entry()?;
        let (due, id) = *entry.key();
        if due > now {
            return None;
        }
        let pending = entry.remove();
        Some(Fired {
            id,
            due,
            generation: pending.generation,
            step: pending.step,
        })
    }

    /// Due time of the earliest pending timer
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(due, _)| *due)
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_pops_in_due_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(80), 1, 2);
        queue.schedule(ms(0), 1, 0);
        queue.schedule(ms(40), 1, 1);

        assert_eq!(queue.next_deadline(), Some(ms(0)));
        assert_eq!(queue.pop_due(ms(100)).map(|f| f.step), Some(0));
        assert_eq!(queue.pop_due(ms(100)).map(|f| f.step), Some(1));
        assert_eq!(queue.pop_due(ms(100)).map(|f| f.step), Some(2));
        assert!(queue.pop_due(ms(100)).is_none());
    }

    #[test]
    fn test_equal_due_keeps_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(10), 1, 7);
        queue.schedule(ms(10), 2, 0);

        assert_eq!(queue.pop_due(ms(10)).map(|f| f.generation), Some(1));
        assert_eq!(queue.pop_due(ms(10)).map(|f| f.generation), Some(2));
    }

    #[test]
    fn test_not_due_yet() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(50), 1, 0);
        assert!(queue.pop_due(ms(49)).is_none());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_cancel_generation() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(0), 1, 0);
        queue.schedule(ms(40), 1, 1);
        queue.schedule(ms(50), 2, 0);

        assert_eq!(queue.cancel_generation(1), 2);
        assert_eq!(queue.pop_due(ms(100)).map(|f| f.generation), Some(2));
        assert_eq!(queue.cancel_all(), 0);
        assert!(queue.is_empty());
    }
}
