//! The ship data record and its nine-step unload process (§4.6).

use crate::config::RunConfig;
use crate::fixed::{Minutes, Tonnes};
use crate::id::{ProcessId, ShipId};
use crate::port::Port;
use crate::process::{ResourceRef, StepResult, Suspend};

/// Per-ship bookkeeping, filled in as its process advances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ship {
    pub tonnage: Tonnes,
    pub arrival_time: Minutes,
    pub queue_len_on_arrival: u32,
    pub first_mooring_time: Minutes,
    pub wait_time: Minutes,
    pub unload_start: Minutes,
    pub unload_duration: Minutes,
    pub trucks_ordinary: u32,
    pub trucks_dedicated: u32,
    /// `true` for a ship pre-seeded into the berth queue at t=0; excluded
    /// from the ships-serviced output table.
    pub pre_seeded: bool,
}

impl Ship {
    pub fn new(tonnage: Tonnes, pre_seeded: bool) -> Self {
        Self {
            tonnage,
            arrival_time: Minutes::ZERO,
            queue_len_on_arrival: 0,
            first_mooring_time: Minutes::ZERO,
            wait_time: Minutes::ZERO,
            unload_start: Minutes::ZERO,
            unload_duration: Minutes::ZERO,
            trucks_ordinary: 0,
            trucks_dedicated: 0,
            pre_seeded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShipStep {
    Arrive,
    MooringPreface,
    OpenTrucks,
    BerthRemainder,
    RecordMooring,
    PreUnloadDelay,
    AwaitUnloadFinish,
    Finalize,
}

pub struct ShipProcess {
    ship_id: ShipId,
    step: ShipStep,
    delay_sample: Minutes,
}

impl ShipProcess {
    pub fn new(ship_id: ShipId) -> Self {
        Self {
            ship_id,
            step: ShipStep::Arrive,
            delay_sample: Minutes::ZERO,
        }
    }

    pub fn ship_id(&self) -> ShipId {
        self.ship_id
    }

    /// Advance one step. `own_process_id` identifies this process for
    /// server request/release calls.
    pub fn resume(
        &mut self,
        own_process_id: ProcessId,
        now: Minutes,
        port: &mut Port,
        cfg: &RunConfig,
        delay_sample: impl FnOnce() -> Minutes,
    ) -> StepResult {
        match self.step {
            ShipStep::Arrive => {
                let queue_len = port.roadstead_length();
                {
                    let ship = &mut port.ships[self.ship_id];
                    ship.arrival_time = now;
                    ship.queue_len_on_arrival = queue_len;
                }
                self.step = ShipStep::MooringPreface;
                StepResult::new(Suspend::Wait(ResourceRef::Berth))
            }
            ShipStep::MooringPreface => {
                self.step = ShipStep::OpenTrucks;
                StepResult::new(Suspend::Timeout(cfg.t_mooring_pre_trucks))
            }
            ShipStep::OpenTrucks => {
                port.current_ship = Some(self.ship_id);
                let woken = port.trucks_may_arrive.fire();
                self.step = ShipStep::BerthRemainder;
                StepResult::with_woken(Suspend::Timeout(cfg.t_mooring_remainder()), woken)
            }
            ShipStep::BerthRemainder => {
                // §4.6 step 5 (record_mooring) has no suspension of its
                // own, so it runs here, directly followed by sampling and
                // waiting out step 6's pre-unload delay.
                {
                    let ship = &mut port.ships[self.ship_id];
                    ship.first_mooring_time = now;
                    ship.wait_time = now - ship.arrival_time;
                }
                self.delay_sample = delay_sample();
                self.step = ShipStep::PreUnloadDelay;
                StepResult::new(Suspend::Timeout(self.delay_sample))
            }
            ShipStep::PreUnloadDelay => {
                // §4.6 step 7 (dump_cargo): deposit the ship's tonnage and
                // fire unload_started the instant the delay elapses, then
                // suspend on unload_finished.
                let tonnage = port.ships[self.ship_id].tonnage;
                let woken_put = port.dock_grain.put(tonnage);
                let woken_fire = port.unload_started.fire();
                port.ships[self.ship_id].unload_start = now;
                port.unload_finished_fired_this_cycle = false;
                self.step = ShipStep::AwaitUnloadFinish;
                let mut woken = woken_put;
                woken.extend(woken_fire);
                StepResult::with_woken(Suspend::Wait(ResourceRef::UnloadFinished), woken)
            }
            ShipStep::AwaitUnloadFinish => {
                // §4.6 step 9 (finalize) runs directly once unload_finished
                // wakes this process; there is nothing left to suspend on.
                port.current_ship = None;
                let unload_start = port.ships[self.ship_id].unload_start;
                port.ships[self.ship_id].unload_duration = now - unload_start;
                port.serviced_ships.push(self.ship_id);
                let woken = port.berth.release(own_process_id);
                self.step = ShipStep::Finalize;
                StepResult::with_woken(Suspend::Terminate, woken.into_iter().collect())
            }
            ShipStep::Finalize => {
                // Never actually resumed: AwaitUnloadFinish already
                // returns Suspend::Terminate, so the dispatcher drops this
                // process before a further resume could reach here.
                unreachable!("ship process resumed after terminating")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimRng;
    use slotmap::SlotMap;

    fn setup() -> (Port, ShipId, ProcessId) {
        let mut port = Port::new();
        let ship_id = port.ships.insert(Ship::new(Tonnes::from_num(1000.0), false));
        let mut procs: SlotMap<ProcessId, ()> = SlotMap::with_key();
        let pid = procs.insert(());
        (port, ship_id, pid)
    }

    #[test]
    fn arrive_records_arrival_time_and_requests_berth() {
        let (mut port, ship_id, pid) = setup();
        let cfg = RunConfig::default();
        let mut proc = ShipProcess::new(ship_id);
        let result = proc.resume(pid, Minutes::from_num(5.0), &mut port, &cfg, || Minutes::ZERO);
        assert_eq!(port.ships[ship_id].arrival_time, Minutes::from_num(5.0));
        assert!(matches!(result.suspend, Suspend::Wait(ResourceRef::Berth)));
    }

    #[test]
    fn open_trucks_sets_current_ship_and_fires_latch() {
        let (mut port, ship_id, pid) = setup();
        let cfg = RunConfig::default();
        let mut proc = ShipProcess::new(ship_id);
        proc.resume(pid, Minutes::ZERO, &mut port, &cfg, || Minutes::ZERO); // Arrive
        proc.resume(pid, Minutes::ZERO, &mut port, &cfg, || Minutes::ZERO); // MooringPreface
        proc.resume(pid, Minutes::ZERO, &mut port, &cfg, || Minutes::ZERO); // OpenTrucks
        assert_eq!(port.current_ship, Some(ship_id));
    }

    #[test]
    fn dump_cargo_deposits_full_tonnage() {
        let (mut port, ship_id, pid) = setup();
        let cfg = RunConfig::default();
        let mut rng = SimRng::new(1);
        let mut proc = ShipProcess::new(ship_id);
        proc.resume(pid, Minutes::ZERO, &mut port, &cfg, || Minutes::ZERO); // Arrive
        proc.resume(pid, Minutes::ZERO, &mut port, &cfg, || Minutes::ZERO); // MooringPreface
        proc.resume(pid, Minutes::ZERO, &mut port, &cfg, || Minutes::ZERO); // OpenTrucks
        proc.resume(pid, Minutes::ZERO, &mut port, &cfg, || rng.exponential(0.01)); // BerthRemainder
        proc.resume(pid, Minutes::ZERO, &mut port, &cfg, || Minutes::ZERO); // PreUnloadDelay
        assert_eq!(port.dock_grain.level(), Tonnes::from_num(1000.0));
    }

    #[test]
    fn finalize_releases_berth_and_records_unload_duration() {
        let (mut port, ship_id, pid) = setup();
        let cfg = RunConfig::default();
        port.berth.request(pid);
        let mut proc = ShipProcess::new(ship_id);
        proc.resume(pid, Minutes::ZERO, &mut port, &cfg, || Minutes::ZERO); // Arrive
        proc.resume(pid, Minutes::ZERO, &mut port, &cfg, || Minutes::ZERO); // MooringPreface
        proc.resume(pid, Minutes::ZERO, &mut port, &cfg, || Minutes::ZERO); // OpenTrucks
        proc.resume(pid, Minutes::ZERO, &mut port, &cfg, || Minutes::ZERO); // BerthRemainder
        proc.resume(pid, Minutes::ZERO, &mut port, &cfg, || Minutes::ZERO); // PreUnloadDelay
        port.ships[ship_id].unload_start = Minutes::from_num(10.0);
        let result = proc.resume(pid, Minutes::from_num(40.0), &mut port, &cfg, || Minutes::ZERO); // AwaitUnloadFinish -> finalize
        assert!(matches!(result.suspend, Suspend::Terminate));
        assert_eq!(port.ships[ship_id].unload_duration, Minutes::from_num(30.0));
        assert!(port.serviced_ships.contains(&ship_id));
        assert!(port.current_ship.is_none());
    }
}
