//! The driver (§4.12): builds the port and optional warehouse, starts the
//! generators and monitors, pre-seeds the initial roadstead queue, runs the
//! scheduler to the configured horizon, and assembles the four output
//! tables. This is the one place that turns a process's [`Suspend`] value
//! into an actual `request`/`get`/`await_latch` call against [`Port`] or
//! [`Warehouse`] — the primitives themselves stay scheduler-agnostic (see
//! [`crate::primitives`]).

use slotmap::{Key, SlotMap};

use crate::config::RunConfig;
use crate::error::RunError;
use crate::fixed::{to_f64, Minutes, Tonnes};
use crate::generators::{OrdinaryTruckGenerator, ShipGenerator, SpawnRequest, WarehouseTruckGenerator};
use crate::id::{ProcessId, TruckId, TruckKind};
use crate::monitors::{DailyMonitor, NoTrucksMonitor};
use crate::port::Port;
use crate::primitives::Outcome;
use crate::process::{ProcessKind, ResourceRef, Suspend};
use crate::results::{ParametersRow, RoadsteadSnapshotRow, RunOutcome, ShipServicedRow};
use crate::rng::SimRng;
use crate::samplers::SimulationInputs;
use crate::scheduler::{Scheduler, WakeReason};
use crate::ship::{Ship, ShipProcess};
use crate::truck::{DedicatedTruckProcess, OrdinaryTruckProcess, WarehouseTruckProcess};
use crate::warehouse::Warehouse;

/// A spawn a generator's `resume` asked for, applied once its own suspend
/// decision has been computed so the borrow on the process arena entry
/// being resumed has already ended.
enum PendingSpawn {
    None,
    Ship(Tonnes),
    Ordinary(Tonnes),
    Warehouse(Tonnes),
}

pub struct Simulation {
    port: Port,
    warehouse: Option<Warehouse>,
    processes: SlotMap<ProcessId, ProcessKind>,
    scheduler: Scheduler,
    rng: SimRng,
    cfg: RunConfig,
    inputs: SimulationInputs,
    next_ordinary_seq: u64,
    next_dedicated_seq: u64,
    next_warehouse_seq: u64,
}

impl Simulation {
    /// Build a run. Validates `cfg` and builds the warehouse iff
    /// `dedicated_trucks > 0`.
    pub fn new(cfg: RunConfig, inputs: SimulationInputs) -> Result<Self, RunError> {
        cfg.validate()?;
        let warehouse = if cfg.dedicated_trucks > 0 {
            Some(Warehouse::new(cfg.initial_grain))
        } else {
            None
        };
        Ok(Self {
            port: Port::new(),
            warehouse,
            processes: SlotMap::with_key(),
            scheduler: Scheduler::new(),
            rng: SimRng::new(cfg.seed),
            cfg,
            inputs,
            next_ordinary_seq: 0,
            next_dedicated_seq: 0,
            next_warehouse_seq: 0,
        })
    }

    /// Run to completion and return the four output tables.
    pub fn run(mut self) -> Result<RunOutcome, RunError> {
        self.spawn(ProcessKind::ShipGenerator(ShipGenerator::new()));
        self.spawn(ProcessKind::OrdinaryTruckGenerator(
            OrdinaryTruckGenerator::new(),
        ));
        self.spawn(ProcessKind::DailyMonitor(DailyMonitor::new()));

        if self.warehouse.is_some() {
            self.spawn(ProcessKind::WarehouseTruckGenerator(
                WarehouseTruckGenerator::new(),
            ));
            self.spawn(ProcessKind::NoTrucksMonitor(NoTrucksMonitor::new()));
            for _ in 0..self.cfg.dedicated_trucks {
                let id = TruckId::new(TruckKind::Dedicated, self.next_dedicated_seq);
                self.next_dedicated_seq += 1;
                let capacity = self.cfg.dedicated_capacity;
                self.spawn(ProcessKind::DedicatedTruck(DedicatedTruckProcess::new(
                    id, capacity,
                )));
            }
        }

        for _ in 0..self.cfg.initial_queued_ships {
            let tonnage = self.inputs.ship_tonnage.sample(&mut self.rng);
            let ship_id = self.port.ships.insert(Ship::new(tonnage, true));
            self.spawn(ProcessKind::Ship(ShipProcess::new(ship_id)));
        }

        let horizon = self.cfg.horizon();
        self.run_until(horizon)?;

        Ok(self.assemble_outcome())
    }

    fn spawn(&mut self, kind: ProcessKind) -> ProcessId {
        let pid = self.processes.insert(kind);
        self.scheduler.schedule_now(pid, WakeReason::Timeout);
        pid
    }

    fn run_until(&mut self, horizon: Minutes) -> Result<(), RunError> {
        while let Some(event) = self.scheduler.pop_due(horizon) {
            self.resume_process(event.process)?;
        }
        self.scheduler.advance_to(horizon);
        Ok(())
    }

    /// Advance one process by one `resume` step, then translate its result
    /// into scheduler/primitive calls: a spawn request, the suspend it
    /// asked for, and any other processes its side effects woke.
    fn resume_process(&mut self, pid: ProcessId) -> Result<(), RunError> {
        let now = self.scheduler.now();
        let Some(kind) = self.processes.get_mut(pid) else {
            // Already removed (e.g. a stale wake after termination); nothing to do.
            return Ok(());
        };

        let mut pending_spawn = PendingSpawn::None;
        let (suspend, woken) = match kind {
            ProcessKind::Ship(proc) => {
                let result = proc.resume(pid, now, &mut self.port, &self.cfg, || {
                    self.inputs.ship_delay.sample(&mut self.rng)
                });
                (result.suspend, result.woken)
            }
            ProcessKind::OrdinaryTruck(proc) => {
                let result = proc.resume(pid, now, &mut self.port, &self.cfg);
                (result.suspend, result.woken)
            }
            ProcessKind::DedicatedTruck(proc) => {
                let warehouse = self
                    .warehouse
                    .as_mut()
                    .expect("dedicated truck requires a configured warehouse");
                let result = proc.resume(pid, now, &mut self.port, warehouse, &self.cfg);
                (result.suspend, result.woken)
            }
            ProcessKind::WarehouseTruck(proc) => {
                let warehouse = self
                    .warehouse
                    .as_mut()
                    .expect("warehouse truck requires a configured warehouse");
                let result = proc.resume(pid, now, warehouse, &self.cfg);
                (result.suspend, result.woken)
            }
            ProcessKind::ShipGenerator(gen) => {
                let step = gen.resume(&mut self.port, &self.cfg, &self.inputs, &mut self.rng);
                if let Some(SpawnRequest::Ship { tonnage }) = step.spawn {
                    pending_spawn = PendingSpawn::Ship(tonnage);
                }
                (step.suspend, Vec::new())
            }
            ProcessKind::OrdinaryTruckGenerator(gen) => {
                let step = gen.resume(now, &self.port, &self.cfg, &self.inputs, &mut self.rng);
                if let Some(SpawnRequest::OrdinaryTruck { capacity }) = step.spawn {
                    pending_spawn = PendingSpawn::Ordinary(capacity);
                }
                (step.suspend, Vec::new())
            }
            ProcessKind::WarehouseTruckGenerator(gen) => {
                let warehouse = self
                    .warehouse
                    .as_ref()
                    .expect("warehouse truck generator requires a configured warehouse");
                let step = gen.resume(now, warehouse, &self.cfg, &self.inputs, &mut self.rng);
                if let Some(SpawnRequest::WarehouseTruck { capacity }) = step.spawn {
                    pending_spawn = PendingSpawn::Warehouse(capacity);
                }
                (step.suspend, Vec::new())
            }
            ProcessKind::NoTrucksMonitor(mon) => {
                let result = mon.resume(&mut self.port);
                (result.suspend, result.woken)
            }
            ProcessKind::DailyMonitor(mon) => {
                let result = mon.resume(&mut self.port);
                (result.suspend, result.woken)
            }
        };

        self.apply_spawn(pending_spawn);
        self.register_suspend(pid, suspend);
        for other in woken {
            self.scheduler.schedule_now(other, WakeReason::LatchFired);
        }
        Ok(())
    }

    fn apply_spawn(&mut self, pending: PendingSpawn) {
        match pending {
            PendingSpawn::None => {}
            PendingSpawn::Ship(tonnage) => {
                let ship_id = self.port.ships.insert(Ship::new(tonnage, false));
                self.spawn(ProcessKind::Ship(ShipProcess::new(ship_id)));
            }
            PendingSpawn::Ordinary(capacity) => {
                let id = TruckId::new(TruckKind::Ordinary, self.next_ordinary_seq);
                self.next_ordinary_seq += 1;
                self.spawn(ProcessKind::OrdinaryTruck(OrdinaryTruckProcess::new(
                    id, capacity,
                )));
            }
            PendingSpawn::Warehouse(capacity) => {
                let id = TruckId::new(TruckKind::WarehouseLoading, self.next_warehouse_seq);
                self.next_warehouse_seq += 1;
                self.spawn(ProcessKind::WarehouseTruck(WarehouseTruckProcess::new(
                    id, capacity,
                )));
            }
        }
    }

    /// Turn a `resume`'s `Suspend` value into the actual scheduler/resource
    /// action: a timeout reschedules directly; a `Wait` makes the real
    /// `request`/`await_latch` call, rescheduling now on an immediate
    /// grant; `Terminate` drops the process from the arena.
    fn register_suspend(&mut self, pid: ProcessId, suspend: Suspend) {
        match suspend {
            Suspend::Timeout(delay) => {
                self.scheduler
                    .schedule_after(delay, pid, WakeReason::Timeout)
                    .expect("a process resume must never request a negative timeout");
            }
            Suspend::Wait(resource) => self.register_wait(pid, resource),
            Suspend::Terminate => {
                self.processes.remove(pid);
            }
        }
    }

    fn register_wait(&mut self, pid: ProcessId, resource: ResourceRef) {
        match resource {
            ResourceRef::Berth => self.request_server(pid, |port| &mut port.berth),
            ResourceRef::EntryGate => self.request_server(pid, |port| &mut port.entry_gate),
            ResourceRef::ExitGate => self.request_server(pid, |port| &mut port.exit_gate),
            ResourceRef::Chute => self.request_server(pid, |port| &mut port.chutes),
            ResourceRef::TrucksMayArrive => self.port.trucks_may_arrive.await_latch(pid),
            ResourceRef::UnloadStarted => self.port.unload_started.await_latch(pid),
            ResourceRef::UnloadFinished => self.port.unload_finished.await_latch(pid),
            ResourceRef::NoTrucksWaiting => self.port.no_trucks_waiting.await_latch(pid),
            ResourceRef::WarehouseLoadServer => {
                let outcome = self.warehouse_mut().load_server.request(pid);
                self.on_request_outcome(pid, outcome);
            }
            ResourceRef::WarehouseUnloadServer => {
                let outcome = self.warehouse_mut().unload_server.request(pid);
                self.on_request_outcome(pid, outcome);
            }
            ResourceRef::WarehouseReplenished => self.warehouse_mut().replenished.await_latch(pid),
        }
    }

    fn request_server(
        &mut self,
        pid: ProcessId,
        server: impl FnOnce(&mut Port) -> &mut crate::primitives::CapacityServer,
    ) {
        let outcome = server(&mut self.port).request(pid);
        self.on_request_outcome(pid, outcome);
    }

    fn on_request_outcome(&mut self, pid: ProcessId, outcome: Outcome) {
        if outcome == Outcome::Granted {
            self.scheduler.schedule_now(pid, WakeReason::ServerGranted);
        }
    }

    fn warehouse_mut(&mut self) -> &mut Warehouse {
        self.warehouse
            .as_mut()
            .expect("warehouse resource requested without a configured warehouse")
    }

    fn assemble_outcome(self) -> RunOutcome {
        let ships_serviced = self
            .port
            .serviced_ships
            .iter()
            .filter_map(|&ship_id| {
                let ship = &self.port.ships[ship_id];
                if ship.pre_seeded {
                    return None;
                }
                Some(ShipServicedRow {
                    ship_id: ship_id.data().as_ffi(),
                    queue_on_arrival: ship.queue_len_on_arrival,
                    tonnage: to_f64(ship.tonnage),
                    arrival_min: to_f64(ship.arrival_time),
                    wait_days: to_f64(ship.wait_time) / 1440.0,
                    unload_days: to_f64(ship.unload_duration) / 1440.0,
                    ordinary_trucks: ship.trucks_ordinary,
                    dedicated_trucks: ship.trucks_dedicated,
                    wait_hours: to_f64(ship.wait_time) / 60.0,
                    unload_hours: to_f64(ship.unload_duration) / 60.0,
                })
            })
            .collect();

        let roadstead_daily = self
            .port
            .daily_snapshots
            .iter()
            .map(|s| RoadsteadSnapshotRow {
                day: s.day,
                roadstead_count: s.roadstead_count,
                total_serviced: s.total_serviced,
                total_lost: s.total_lost,
            })
            .collect();

        let warehouse_events = self.warehouse.map(|w| w.events).unwrap_or_default();

        let parameters = Some(ParametersRow {
            years: self.cfg.years,
            dedicated_trucks: self.cfg.dedicated_trucks,
            initial_grain: to_f64(self.cfg.initial_grain),
            dedicated_capacity: to_f64(self.cfg.dedicated_capacity),
            warehouse_probability: self.cfg.warehouse_probability,
            initial_queued_ships: self.cfg.initial_queued_ships,
            seed: self.cfg.seed,
        });

        RunOutcome {
            ships_serviced,
            roadstead_daily,
            warehouse_events,
            parameters,
        }
    }
}
