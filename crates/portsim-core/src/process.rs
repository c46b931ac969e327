//! The shared vocabulary every process state machine suspends through:
//! what it's waiting for ([`ResourceRef`]), and the result of one resume
//! step ([`Suspend`]). Concrete state machines live in [`crate::ship`],
//! [`crate::truck`], [`crate::generators`], and [`crate::monitors`];
//! [`ProcessKind`] is the enum [`crate::simulation::Simulation`] dispatches
//! through, the "no coroutine keyword" stand-in for an `async fn` per
//! process.

use crate::fixed::Minutes;
use crate::generators::{OrdinaryTruckGenerator, ShipGenerator, WarehouseTruckGenerator};
use crate::id::ProcessId;
use crate::monitors::{DailyMonitor, NoTrucksMonitor};
use crate::ship::ShipProcess;
use crate::truck::{DedicatedTruckProcess, OrdinaryTruckProcess, WarehouseTruckProcess};

/// A resource a process can suspend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceRef {
    Berth,
    EntryGate,
    ExitGate,
    Chute,
    TrucksMayArrive,
    UnloadStarted,
    UnloadFinished,
    NoTrucksWaiting,
    WarehouseLoadServer,
    WarehouseUnloadServer,
    WarehouseReplenished,
}

/// What a process's `resume` step asked to do next. `Wait`'s actual
/// `request`/`get`/`await_latch` call against the named resource is made by
/// [`crate::simulation::Simulation`]'s dispatcher, not by the process
/// itself — primitives take no scheduler reference (see
/// [`crate::primitives`]), so something above both has to bridge them.
#[derive(Debug, Clone, Copy)]
pub enum Suspend {
    /// Resume again after `d` virtual minutes.
    Timeout(Minutes),
    /// Resume once `resource` grants.
    Wait(ResourceRef),
    /// The process has completed; it is dropped from the process arena.
    Terminate,
}

/// What one `resume` call produced: what the process is waiting for next,
/// plus any other processes a side effect of this step woke up (a latch
/// fire, a server release, a reservoir put). The dispatcher schedules
/// each woken process as a zero-delay wake-up in the same instant.
#[derive(Debug, Clone)]
pub struct StepResult {
    pub suspend: Suspend,
    pub woken: Vec<ProcessId>,
}

impl StepResult {
    pub fn new(suspend: Suspend) -> Self {
        Self {
            suspend,
            woken: Vec::new(),
        }
    }

    pub fn with_woken(suspend: Suspend, woken: Vec<ProcessId>) -> Self {
        Self { suspend, woken }
    }
}

/// The concrete state machine backing a scheduled process. Dispatch lives
/// on [`crate::simulation::Simulation`], which owns the port, the
/// optional warehouse, the scheduler, and the RNG every variant's
/// `resume` needs.
pub enum ProcessKind {
    Ship(ShipProcess),
    OrdinaryTruck(OrdinaryTruckProcess),
    DedicatedTruck(DedicatedTruckProcess),
    WarehouseTruck(WarehouseTruckProcess),
    ShipGenerator(ShipGenerator),
    OrdinaryTruckGenerator(OrdinaryTruckGenerator),
    WarehouseTruckGenerator(WarehouseTruckGenerator),
    NoTrucksMonitor(NoTrucksMonitor),
    DailyMonitor(DailyMonitor),
}
