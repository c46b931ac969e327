//! Resource-reservation primitives the process state machines suspend on:
//! a capacity-limited server, a bounded reservoir, and a re-armable latch.
//! None of these own a scheduler reference; callers combine the outcome
//! they return with [`crate::scheduler::Scheduler::schedule_now`] /
//! `schedule_after` themselves, which keeps the primitives free of any
//! dependency on the process enum they're suspending.

use std::collections::VecDeque;

use crate::fixed::Tonnes;
use crate::id::ProcessId;

/// Outcome of a [`CapacityServer::request`] or [`Reservoir::get`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Granted immediately; the caller proceeds without suspending.
    Granted,
    /// Queued; the caller must suspend until woken.
    Queued,
}

/// A resource with integer capacity `C` and a FIFO wait queue.
#[derive(Debug, Clone)]
pub struct CapacityServer {
    capacity: u32,
    holders: Vec<ProcessId>,
    queue: VecDeque<ProcessId>,
}

impl CapacityServer {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            holders: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    pub fn active_count(&self) -> u32 {
        self.holders.len() as u32
    }

    pub fn queue_length(&self) -> usize {
        self.queue.len()
    }

    /// `true` iff the server has no active holders and nobody waiting —
    /// the condition the no-trucks-waiting monitor polls for on the entry
    /// gate.
    pub fn is_idle(&self) -> bool {
        self.holders.is_empty() && self.queue.is_empty()
    }

    /// Request a token. Returns `Granted` if capacity allows it (`who` is
    /// now a holder); otherwise enqueues `who` and returns `Queued`.
    pub fn request(&mut self, who: ProcessId) -> Outcome {
        if self.active_count() < self.capacity {
            self.holders.push(who);
            Outcome::Granted
        } else {
            self.queue.push_back(who);
            Outcome::Queued
        }
    }

    /// Release `who`'s token. If the queue is non-empty, the head waiter
    /// is granted the freed slot in the same instant and returned so the
    /// caller can schedule its wake-up.
    ///
    /// `who` must currently be a holder; releasing a token the caller
    /// doesn't hold is a usage bug, fatal in debug builds.
    pub fn release(&mut self, who: ProcessId) -> Option<ProcessId> {
        let pos = self.holders.iter().position(|&h| h == who);
        debug_assert!(
            pos.is_some(),
            "release of a capacity-server token not held by this process"
        );
        if let Some(pos) = pos {
            self.holders.swap_remove(pos);
        }
        if let Some(next) = self.queue.pop_front() {
            self.holders.push(next);
            Some(next)
        } else {
            None
        }
    }
}

/// A non-negative level of [`Tonnes`] with non-blocking `put` and
/// blocking, FIFO-fair `get`.
#[derive(Debug, Clone)]
pub struct Reservoir {
    level: Tonnes,
    waiters: VecDeque<(ProcessId, Tonnes)>,
}

impl Reservoir {
    pub fn new(initial: Tonnes) -> Self {
        Self {
            level: initial,
            waiters: VecDeque::new(),
        }
    }

    pub fn level(&self) -> Tonnes {
        self.level
    }

    /// Deposit `amount` (never blocks). Returns the processes whose
    /// blocked `get` could now be satisfied, in FIFO order, already
    /// deducted from `level`.
    pub fn put(&mut self, amount: Tonnes) -> Vec<ProcessId> {
        self.level += amount;
        let mut woken = Vec::new();
        while let Some(&(who, needed)) = self.waiters.front() {
            if self.level >= needed {
                self.level -= needed;
                woken.push(who);
                self.waiters.pop_front();
            } else {
                break;
            }
        }
        woken
    }

    /// Request `amount`. Granted immediately if available; otherwise `who`
    /// is enqueued (FIFO) until a `put` brings the level high enough.
    pub fn get(&mut self, who: ProcessId, amount: Tonnes) -> Outcome {
        if self.level >= amount {
            self.level -= amount;
            Outcome::Granted
        } else {
            self.waiters.push_back((who, amount));
            Outcome::Queued
        }
    }
}

/// A re-armable one-shot wake signal. `await_latch` records a waiter;
/// `fire` drains every current waiter in FIFO order and implicitly
/// re-arms (the waiter list is simply empty again), so a waiter that
/// starts waiting after the fire must wait for the next one.
#[derive(Debug, Clone, Default)]
pub struct Latch {
    waiters: VecDeque<ProcessId>,
}

impl Latch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn await_latch(&mut self, who: ProcessId) {
        self.waiters.push_back(who);
    }

    /// Drain and return all current waiters, in the order they began
    /// waiting. A fire with no waiters is a harmless no-op.
    pub fn fire(&mut self) -> Vec<ProcessId> {
        self.waiters.drain(..).collect()
    }
}
