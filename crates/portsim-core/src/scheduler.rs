//! Virtual-time event queue.
//!
//! A single binary min-heap keyed by `(Minutes, u64)` drives every
//! suspension kind uniformly: a process timeout, a capacity-server handoff,
//! a reservoir grant, and a latch fire all become a [`ScheduledEvent`]
//! pushed through [`Scheduler::schedule_after`], tagged with the next value
//! of one global sequence counter. Ties at the same virtual instant always
//! resolve in enqueue order because they share that one counter, with no
//! special-casing per suspension kind.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::SchedulerError;
use crate::fixed::Minutes;
use crate::id::ProcessId;

/// Why a process is being resumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeReason {
    Timeout,
    ServerGranted,
    ReservoirGranted,
    LatchFired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledEvent {
    pub time: Minutes,
    pub seq: u64,
    pub process: ProcessId,
    pub reason: WakeReason,
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap (a max-heap) pops the smallest (time, seq).
        (other.time, other.seq).cmp(&(self.time, self.seq))
    }
}

pub struct Scheduler {
    now: Minutes,
    next_seq: u64,
    heap: BinaryHeap<ScheduledEvent>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            now: Minutes::ZERO,
            next_seq: 0,
            heap: BinaryHeap::new(),
        }
    }

    pub fn now(&self) -> Minutes {
        self.now
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Schedule `process` to wake after `delay` minutes from `now`.
    /// `delay` must be non-negative.
    pub fn schedule_after(
        &mut self,
        delay: Minutes,
        process: ProcessId,
        reason: WakeReason,
    ) -> Result<(), SchedulerError> {
        if delay < Minutes::ZERO {
            return Err(SchedulerError::NegativeTimeout(
                crate::fixed::to_f64(delay).to_string(),
            ));
        }
        let time = self.now + delay;
        let seq = self.next_seq();
        self.heap.push(ScheduledEvent {
            time,
            seq,
            process,
            reason,
        });
        Ok(())
    }

    /// Schedule a zero-delay wake at the current instant, used for server
    /// handoffs, reservoir grants, and latch fires: all suspensions that
    /// resume "at the same virtual instant" as the event that released them.
    pub fn schedule_now(&mut self, process: ProcessId, reason: WakeReason) {
        self.schedule_after(Minutes::ZERO, process, reason)
            .expect("zero delay is never negative");
    }

    /// Pop the earliest event, if its time is strictly before `horizon`.
    /// Advances `now` to that event's time. Returns `None` once the heap is
    /// empty or the next event would land at or after `horizon`.
    pub fn pop_due(&mut self, horizon: Minutes) -> Option<ScheduledEvent> {
        match self.heap.peek() {
            Some(ev) if ev.time < horizon => {
                let ev = self.heap.pop().expect("peeked Some");
                debug_assert!(ev.time >= self.now, "virtual time must not go backwards");
                self.now = ev.time;
                Some(ev)
            }
            _ => None,
        }
    }

    /// Jump `now` forward to `horizon` without processing further events.
    /// Called once `pop_due` has drained everything before `horizon`.
    pub fn advance_to(&mut self, horizon: Minutes) {
        debug_assert!(horizon >= self.now);
        self.now = horizon;
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
