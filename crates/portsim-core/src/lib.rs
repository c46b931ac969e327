//! Port Sim Core -- the discrete-event simulation engine for bulk-grain
//! unloading operations at a single-berth port terminal.
//!
//! This crate provides the virtual-time scheduler, the resource
//! primitives (capacity servers, reservoirs, latches) built on it, the
//! ship/truck/warehouse process state machines, and the deterministic
//! fixed-point arithmetic and RNG that the whole simulation depends on.
//!
//! # Cooperative Scheduling
//!
//! There is no `async`/`await` anywhere in this crate. Each entity (a
//! ship, a truck, a generator, a monitor) is a state machine advanced one
//! step at a time by [`simulation::Simulation::run`]: a process runs until
//! it asks to suspend (timeout, wait on a latch, request a server, wait on
//! a reservoir), the driver translates that into a scheduler or primitive
//! call, and the scheduler moves on to the next earliest event. This keeps
//! the whole engine single-threaded and trivially deterministic for a
//! given seed.
//!
//! # Key Types
//!
//! - [`scheduler::Scheduler`] -- owns the event heap and virtual clock.
//! - [`primitives::CapacityServer`] -- FIFO-queued integer-capacity
//!   resource (berth, gates, chutes, warehouse bays).
//! - [`primitives::Reservoir`] -- bounded buffer with blocking `get`
//!   (dock grain, warehouse inventory).
//! - [`primitives::Latch`] -- one-shot, re-armable "wake everyone waiting"
//!   signal (mooring-complete, unload-finished, replenishment, meal-break).
//! - [`simulation::Simulation`] -- builds the port (and optional
//!   warehouse), starts the generators and monitors, and drives the run
//!   to completion.
//! - [`fixed::Minutes`] -- Q32.32 fixed-point type for deterministic
//!   virtual time.
//! - [`rng::SimRng`] -- seeded PRNG for empirical sampling and
//!   exponential inter-arrival draws.

pub mod config;
pub mod error;
pub mod fixed;
pub mod generators;
pub mod id;
pub mod monitors;
pub mod port;
pub mod primitives;
pub mod process;
pub mod results;
pub mod rng;
pub mod samplers;
pub mod scheduler;
pub mod ship;
pub mod simulation;
pub mod truck;
pub mod warehouse;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
