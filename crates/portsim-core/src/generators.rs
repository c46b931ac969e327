//! The three arrival generators: ships (§4.10), ordinary trucks, and
//! warehouse-loading trucks. Each is a process like any other — it just
//! never terminates and its only payload is requesting that
//! [`crate::simulation::Simulation`] spawn a new process on its behalf.

use crate::config::RunConfig;
use crate::fixed::{minutes, Minutes, Tonnes};
use crate::port::Port;
use crate::process::{ResourceRef, Suspend};
use crate::rng::SimRng;
use crate::samplers::{shift_of, SimulationInputs};
use crate::warehouse::Warehouse;

/// What a generator's `resume` asked [`crate::simulation::Simulation`] to
/// create, alongside the usual suspend instruction. Kept separate from
/// [`crate::process::StepResult`] since only generators produce it.
#[derive(Debug, Clone, Copy)]
pub enum SpawnRequest {
    Ship { tonnage: Tonnes },
    OrdinaryTruck { capacity: Tonnes },
    WarehouseTruck { capacity: Tonnes },
}

#[derive(Debug, Clone, Copy)]
pub struct GeneratorStep {
    pub suspend: Suspend,
    pub spawn: Option<SpawnRequest>,
}

impl GeneratorStep {
    pub fn new(suspend: Suspend) -> Self {
        Self {
            suspend,
            spawn: None,
        }
    }

    pub fn with_spawn(mut self, spawn: SpawnRequest) -> Self {
        self.spawn = Some(spawn);
        self
    }
}

// ---------------------------------------------------------------------
// Ship generator
// ---------------------------------------------------------------------

/// Draws Exp(`ship_arrival_rate`) inter-arrival times forever. Each time
/// one elapses, either a new ship is admitted to the roadstead or, if the
/// roadstead is already at `max_roadstead`, it's counted as lost.
pub struct ShipGenerator {
    started: bool,
}

impl ShipGenerator {
    pub fn new() -> Self {
        Self { started: false }
    }

    pub fn resume(
        &mut self,
        port: &mut Port,
        cfg: &RunConfig,
        inputs: &SimulationInputs,
        rng: &mut SimRng,
    ) -> GeneratorStep {
        let spawn = if self.started {
            if port.roadstead_length() < cfg.max_roadstead {
                Some(SpawnRequest::Ship {
                    tonnage: inputs.ship_tonnage.sample(rng),
                })
            } else {
                port.lost_ships += 1;
                None
            }
        } else {
            self.started = true;
            None
        };
        let delay = rng.exponential(inputs.ship_arrival_rate);
        let step = GeneratorStep::new(Suspend::Timeout(delay));
        match spawn {
            Some(s) => step.with_spawn(s),
            None => step,
        }
    }
}

impl Default for ShipGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------
// Ordinary truck generator
// ---------------------------------------------------------------------

/// While a ship currently holds the berth, repeatedly draws a shift-rated
/// inter-arrival time but only honours it with probability `1 - p` (the
/// rest of the traffic is routed to the warehouse fleet instead); a failed
/// draw retries immediately, in the same virtual instant, rather than
/// consuming a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrdinaryGenStep {
    AwaitTrucksMayArrive,
    Decide,
    AfterSpawnDelay,
}

pub struct OrdinaryTruckGenerator {
    step: OrdinaryGenStep,
}

impl OrdinaryTruckGenerator {
    pub fn new() -> Self {
        Self {
            step: OrdinaryGenStep::AwaitTrucksMayArrive,
        }
    }

    fn decide(
        &mut self,
        now: Minutes,
        port: &Port,
        cfg: &RunConfig,
        inputs: &SimulationInputs,
        rng: &mut SimRng,
    ) -> GeneratorStep {
        if port.current_ship.is_none() {
            self.step = OrdinaryGenStep::AwaitTrucksMayArrive;
            return GeneratorStep::new(Suspend::Wait(ResourceRef::TrucksMayArrive));
        }
        let rate = inputs.shift_rates.rate(shift_of(now));
        let go_to_port_probability = minutes(1.0 - cfg.warehouse_probability);
        if go_to_port_probability > Minutes::ZERO && rng.chance(go_to_port_probability) {
            let delay = rng.exponential(rate);
            self.step = OrdinaryGenStep::AfterSpawnDelay;
            GeneratorStep::new(Suspend::Timeout(delay))
        } else if go_to_port_probability <= Minutes::ZERO {
            // p == 1.0: this draw can never succeed, so retrying at zero
            // delay would spin forever without advancing virtual time.
            // Re-check on the same shift-rated cadence a successful draw
            // would have used instead; no ordinary truck is ever spawned.
            self.step = OrdinaryGenStep::Decide;
            GeneratorStep::new(Suspend::Timeout(rng.exponential(rate)))
        } else {
            self.step = OrdinaryGenStep::Decide;
            GeneratorStep::new(Suspend::Timeout(Minutes::ZERO))
        }
    }

    pub fn resume(
        &mut self,
        now: Minutes,
        port: &Port,
        cfg: &RunConfig,
        inputs: &SimulationInputs,
        rng: &mut SimRng,
    ) -> GeneratorStep {
        match self.step {
            OrdinaryGenStep::AwaitTrucksMayArrive => {
                self.step = OrdinaryGenStep::Decide;
                GeneratorStep::new(Suspend::Wait(ResourceRef::TrucksMayArrive))
            }
            OrdinaryGenStep::Decide => self.decide(now, port, cfg, inputs, rng),
            OrdinaryGenStep::AfterSpawnDelay => {
                let capacity = inputs.truck_capacity.sample(rng);
                self.decide(now, port, cfg, inputs, rng)
                    .with_spawn(SpawnRequest::OrdinaryTruck { capacity })
            }
        }
    }
}

impl Default for OrdinaryTruckGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------
// Warehouse truck generator
// ---------------------------------------------------------------------

/// Mirror image of [`OrdinaryTruckGenerator`]: while the warehouse holds
/// grain, repeatedly draws a shift-rated inter-arrival time and honours it
/// with probability `p`; sleeps on `replenished` once the warehouse runs
/// dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WarehouseGenStep {
    AwaitReplenished,
    Decide,
    AfterSpawnDelay,
}

pub struct WarehouseTruckGenerator {
    step: WarehouseGenStep,
}

impl WarehouseTruckGenerator {
    pub fn new() -> Self {
        Self {
            step: WarehouseGenStep::AwaitReplenished,
        }
    }

    fn decide(
        &mut self,
        now: Minutes,
        warehouse: &Warehouse,
        cfg: &RunConfig,
        inputs: &SimulationInputs,
        rng: &mut SimRng,
    ) -> GeneratorStep {
        if warehouse.inventory.level() == Tonnes::ZERO {
            self.step = WarehouseGenStep::AwaitReplenished;
            return GeneratorStep::new(Suspend::Wait(ResourceRef::WarehouseReplenished));
        }
        let rate = inputs.shift_rates.rate(shift_of(now));
        if rng.chance(minutes(cfg.warehouse_probability)) {
            let delay = rng.exponential(rate);
            self.step = WarehouseGenStep::AfterSpawnDelay;
            GeneratorStep::new(Suspend::Timeout(delay))
        } else {
            self.step = WarehouseGenStep::Decide;
            GeneratorStep::new(Suspend::Timeout(Minutes::ZERO))
        }
    }

    pub fn resume(
        &mut self,
        now: Minutes,
        warehouse: &Warehouse,
        cfg: &RunConfig,
        inputs: &SimulationInputs,
        rng: &mut SimRng,
    ) -> GeneratorStep {
        match self.step {
            WarehouseGenStep::AwaitReplenished => {
                self.step = WarehouseGenStep::Decide;
                GeneratorStep::new(Suspend::Wait(ResourceRef::WarehouseReplenished))
            }
            WarehouseGenStep::Decide => self.decide(now, warehouse, cfg, inputs, rng),
            WarehouseGenStep::AfterSpawnDelay => {
                let capacity = inputs.truck_capacity.sample(rng);
                self.decide(now, warehouse, cfg, inputs, rng)
                    .with_spawn(SpawnRequest::WarehouseTruck { capacity })
            }
        }
    }
}

impl Default for WarehouseTruckGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samplers::{EmpiricalColumn, ShiftRates};

    fn inputs() -> SimulationInputs {
        SimulationInputs {
            ship_arrival_rate: 0.01,
            shift_rates: ShiftRates::new(0.05, 0.05, 0.05),
            ship_tonnage: EmpiricalColumn::new("tonnage", vec![minutes(1000.0)]).unwrap(),
            ship_delay: EmpiricalColumn::new("delay", vec![minutes(30.0)]).unwrap(),
            truck_capacity: EmpiricalColumn::new("capacity", vec![minutes(20.0)]).unwrap(),
        }
    }

    #[test]
    fn ship_generator_first_resume_never_spawns() {
        let mut port = Port::new();
        let cfg = RunConfig::default();
        let data = inputs();
        let mut rng = SimRng::new(1);
        let mut gen = ShipGenerator::new();
        let step = gen.resume(&mut port, &cfg, &data, &mut rng);
        assert!(step.spawn.is_none());
    }

    #[test]
    fn ship_generator_counts_lost_ships_when_roadstead_full() {
        let mut port = Port::new();
        let mut cfg = RunConfig::default();
        cfg.max_roadstead = 1;
        let data = inputs();
        let mut rng = SimRng::new(1);
        let mut gen = ShipGenerator::new();
        gen.resume(&mut port, &cfg, &data, &mut rng); // started = true, no spawn yet
        let mut procs: slotmap::SlotMap<crate::id::ProcessId, ()> = slotmap::SlotMap::with_key();
        let pid = procs.insert(());
        port.berth.request(pid); // roadstead now at capacity
        let step = gen.resume(&mut port, &cfg, &data, &mut rng);
        assert!(step.spawn.is_none());
        assert_eq!(port.lost_ships, 1);
    }

    #[test]
    fn ordinary_truck_generator_waits_until_trucks_may_arrive() {
        let port = Port::new();
        let cfg = RunConfig::default();
        let data = inputs();
        let mut rng = SimRng::new(1);
        let mut gen = OrdinaryTruckGenerator::new();
        let step = gen.resume(Minutes::ZERO, &port, &cfg, &data, &mut rng);
        assert!(matches!(
            step.suspend,
            Suspend::Wait(ResourceRef::TrucksMayArrive)
        ));
        assert!(step.spawn.is_none());
    }

    #[test]
    fn ordinary_truck_generator_goes_back_to_waiting_without_a_ship() {
        let port = Port::new();
        let cfg = RunConfig::default();
        let data = inputs();
        let mut rng = SimRng::new(1);
        let mut gen = OrdinaryTruckGenerator::new();
        gen.resume(Minutes::ZERO, &port, &cfg, &data, &mut rng); // -> Decide
        let step = gen.resume(Minutes::ZERO, &port, &cfg, &data, &mut rng); // Decide, no ship
        assert!(matches!(
            step.suspend,
            Suspend::Wait(ResourceRef::TrucksMayArrive)
        ));
    }

    #[test]
    fn ordinary_truck_generator_at_p_one_never_spawns_and_advances_time() {
        let mut port = Port::new();
        let mut ships: slotmap::SlotMap<crate::id::ShipId, ()> = slotmap::SlotMap::with_key();
        port.current_ship = Some(ships.insert(()));
        let mut cfg = RunConfig::default();
        cfg.warehouse_probability = 1.0;
        let data = inputs();
        let mut rng = SimRng::new(1);
        let mut gen = OrdinaryTruckGenerator::new();
        gen.resume(Minutes::ZERO, &port, &cfg, &data, &mut rng); // AwaitTrucksMayArrive -> Decide
        let mut total_delay = Minutes::ZERO;
        for _ in 0..20 {
            let step = gen.resume(Minutes::ZERO, &port, &cfg, &data, &mut rng);
            assert!(step.spawn.is_none());
            match step.suspend {
                Suspend::Timeout(delay) => total_delay += delay,
                other => panic!("expected a timeout, got {other:?}"),
            }
        }
        assert!(
            total_delay > Minutes::ZERO,
            "zero-delay retries across 20 draws would mean p == 1.0 never advances virtual time"
        );
    }

    #[test]
    fn warehouse_truck_generator_waits_on_empty_inventory() {
        let wh = Warehouse::new(Tonnes::ZERO);
        let cfg = RunConfig::default();
        let data = inputs();
        let mut rng = SimRng::new(1);
        let mut gen = WarehouseTruckGenerator::new();
        let step = gen.resume(Minutes::ZERO, &wh, &cfg, &data, &mut rng);
        assert!(matches!(
            step.suspend,
            Suspend::Wait(ResourceRef::WarehouseReplenished)
        ));
    }
}
