//! The three truck process state machines: ordinary (§4.7), dedicated
//! (§4.8, runs forever), and warehouse-loading (§4.9). Trucks are
//! short-lived and never looked up after creation, so each process simply
//! owns its own `TruckId`/`capacity`/`payload` fields rather than living
//! in an arena.

use crate::config::RunConfig;
use crate::fixed::{to_f64, Minutes, Tonnes};
use crate::id::{ProcessId, TruckId};
use crate::port::Port;
use crate::process::{ResourceRef, StepResult, Suspend};
use crate::results::{WarehouseActivity, WarehouseEventRow};
use crate::warehouse::Warehouse;

/// Meal-break windows, minute-of-day, closed-left. A truck mid-gate/chute
/// sequence suspends until the window's right edge.
const MEAL_BREAKS: [(f64, f64); 4] = [
    (420.0, 480.0),
    (780.0, 840.0),
    (900.0, 960.0),
    (1380.0, 1440.0),
];

/// If `now` falls inside a meal-break window, the remaining minutes until
/// its right edge; otherwise `None`.
fn meal_break_remaining(now: Minutes) -> Option<Minutes> {
    let minute_of_day = now % crate::fixed::MINUTES_PER_DAY;
    for &(start, end) in &MEAL_BREAKS {
        let start = Minutes::from_num(start);
        let end = Minutes::from_num(end);
        if minute_of_day >= start && minute_of_day < end {
            return Some(end - minute_of_day);
        }
    }
    None
}

/// `true` if firing `unload_finished` is warranted right now: the dock is
/// empty and nobody has already fired it for this cycle (§9 Open
/// Questions, the `.triggered` guard).
fn should_fire_unload_finished(port: &Port) -> bool {
    port.dock_grain.level() == Tonnes::ZERO && !port.unload_finished_fired_this_cycle
}

fn fire_unload_finished_if_due(port: &mut Port) -> Vec<ProcessId> {
    if should_fire_unload_finished(port) {
        port.unload_finished_fired_this_cycle = true;
        port.unload_finished.fire()
    } else {
        Vec::new()
    }
}

// ---------------------------------------------------------------------
// Ordinary truck (§4.7)
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrdinaryStep {
    RequestEntryGate,
    WaitHalfGateIn1,
    RequestChute,
    WaitHalfGateIn2,
    MealBreakGuard,
    AwaitUnloadStarted,
    AfterLoadChute,
    AfterExitGateRequested,
}

pub struct OrdinaryTruckProcess {
    id: TruckId,
    capacity: Tonnes,
    payload: Tonnes,
    step: OrdinaryStep,
}

impl OrdinaryTruckProcess {
    pub fn new(id: TruckId, capacity: Tonnes) -> Self {
        Self {
            id,
            capacity,
            payload: Tonnes::ZERO,
            step: OrdinaryStep::RequestEntryGate,
        }
    }

    pub fn id(&self) -> TruckId {
        self.id
    }

    /// Take the grain immediately available (`min(capacity, level)`),
    /// credit the current ship, and fire `unload_finished` if that empties
    /// the dock. Shared by the meal-break-guard fallthrough and the
    /// post-`unload_started` wake.
    fn load_and_continue(
        &mut self,
        own_process_id: ProcessId,
        port: &mut Port,
        cfg: &RunConfig,
    ) -> StepResult {
        let load = self.capacity.min(port.dock_grain.level());
        let outcome = port.dock_grain.get(own_process_id, load);
        debug_assert_eq!(
            outcome,
            crate::primitives::Outcome::Granted,
            "load was capped to the current level, so get() must grant immediately"
        );
        self.payload = load;
        if let Some(ship_id) = port.current_ship {
            port.ships[ship_id].trucks_ordinary += 1;
        }
        let woken = fire_unload_finished_if_due(port);
        self.step = OrdinaryStep::AfterLoadChute;
        StepResult::with_woken(Suspend::Timeout(cfg.t_load_chute), woken)
    }

    pub fn resume(
        &mut self,
        own_process_id: ProcessId,
        now: Minutes,
        port: &mut Port,
        cfg: &RunConfig,
    ) -> StepResult {
        match self.step {
            OrdinaryStep::RequestEntryGate => {
                self.step = OrdinaryStep::WaitHalfGateIn1;
                StepResult::new(Suspend::Wait(ResourceRef::EntryGate))
            }
            OrdinaryStep::WaitHalfGateIn1 => {
                self.step = OrdinaryStep::RequestChute;
                StepResult::new(Suspend::Timeout(cfg.t_gate_in / Minutes::from_num(2.0)))
            }
            OrdinaryStep::RequestChute => {
                self.step = OrdinaryStep::WaitHalfGateIn2;
                StepResult::new(Suspend::Wait(ResourceRef::Chute))
            }
            OrdinaryStep::WaitHalfGateIn2 => {
                self.step = OrdinaryStep::MealBreakGuard;
                StepResult::new(Suspend::Timeout(cfg.t_gate_in / Minutes::from_num(2.0)))
            }
            OrdinaryStep::MealBreakGuard => {
                let woken = port.entry_gate.release(own_process_id);
                if let Some(remaining) = meal_break_remaining(now) {
                    return StepResult::with_woken(
                        Suspend::Timeout(remaining),
                        woken.into_iter().collect(),
                    );
                }
                if port.dock_grain.level() == Tonnes::ZERO || port.current_ship.is_none() {
                    self.step = OrdinaryStep::AwaitUnloadStarted;
                    return StepResult::with_woken(
                        Suspend::Wait(ResourceRef::UnloadStarted),
                        woken.into_iter().collect(),
                    );
                }
                let mut result = self.load_and_continue(own_process_id, port, cfg);
                result.woken.extend(woken);
                result
            }
            OrdinaryStep::AwaitUnloadStarted => self.load_and_continue(own_process_id, port, cfg),
            OrdinaryStep::AfterLoadChute => {
                let woken = port.chutes.release(own_process_id);
                self.step = OrdinaryStep::AfterExitGateRequested;
                StepResult::with_woken(
                    Suspend::Wait(ResourceRef::ExitGate),
                    woken.into_iter().collect(),
                )
            }
            OrdinaryStep::AfterExitGateRequested => {
                let woken = port.exit_gate.release(own_process_id);
                StepResult::with_woken(Suspend::Terminate, woken.into_iter().collect())
            }
        }
    }
}

// ---------------------------------------------------------------------
// Dedicated truck (§4.8) -- runs forever until the scheduler stops.
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DedicatedStep {
    AwaitNoTrucksWaiting,
    AfterNoTrucksWait,
    RequestEntryGate,
    AfterEntryGateGranted,
    RequestChute,
    MealBreakGuard,
    AwaitUnloadStarted,
    AfterLoadChute,
    AfterToWarehouseWait,
    AfterUnloadServerGranted,
    AfterExitWarehouseWait,
}

pub struct DedicatedTruckProcess {
    id: TruckId,
    capacity: Tonnes,
    payload: Tonnes,
    step: DedicatedStep,
    unload_queue_start: Minutes,
}

impl DedicatedTruckProcess {
    pub fn new(id: TruckId, capacity: Tonnes) -> Self {
        Self {
            id,
            capacity,
            payload: Tonnes::ZERO,
            step: DedicatedStep::AwaitNoTrucksWaiting,
            unload_queue_start: Minutes::ZERO,
        }
    }

    pub fn id(&self) -> TruckId {
        self.id
    }

    fn load_and_continue(
        &mut self,
        own_process_id: ProcessId,
        port: &mut Port,
        cfg: &RunConfig,
    ) -> StepResult {
        let load = self.capacity.min(port.dock_grain.level());
        let outcome = port.dock_grain.get(own_process_id, load);
        debug_assert_eq!(outcome, crate::primitives::Outcome::Granted);
        self.payload = load;
        if let Some(ship_id) = port.current_ship {
            port.ships[ship_id].trucks_dedicated += 1;
        }
        let woken = fire_unload_finished_if_due(port);
        self.step = DedicatedStep::AfterLoadChute;
        StepResult::with_woken(Suspend::Timeout(cfg.t_load_chute), woken)
    }

    pub fn resume(
        &mut self,
        own_process_id: ProcessId,
        now: Minutes,
        port: &mut Port,
        warehouse: &mut Warehouse,
        cfg: &RunConfig,
    ) -> StepResult {
        match self.step {
            DedicatedStep::AwaitNoTrucksWaiting => {
                self.step = DedicatedStep::AfterNoTrucksWait;
                StepResult::new(Suspend::Wait(ResourceRef::NoTrucksWaiting))
            }
            DedicatedStep::AfterNoTrucksWait => {
                self.step = DedicatedStep::RequestEntryGate;
                StepResult::new(Suspend::Timeout(Minutes::from_num(2.0)))
            }
            DedicatedStep::RequestEntryGate => {
                if !port.entry_gate.is_idle() {
                    // Condition didn't hold at the end of the sleep; go
                    // back to waiting for the no-trucks-waiting signal.
                    self.step = DedicatedStep::AwaitNoTrucksWaiting;
                    return StepResult::new(Suspend::Wait(ResourceRef::NoTrucksWaiting));
                }
                self.step = DedicatedStep::AfterEntryGateGranted;
                StepResult::new(Suspend::Wait(ResourceRef::EntryGate))
            }
            DedicatedStep::AfterEntryGateGranted => {
                self.step = DedicatedStep::RequestChute;
                StepResult::new(Suspend::Timeout(cfg.t_gate_in))
            }
            DedicatedStep::RequestChute => {
                self.step = DedicatedStep::MealBreakGuard;
                StepResult::new(Suspend::Wait(ResourceRef::Chute))
            }
            DedicatedStep::MealBreakGuard => {
                let woken = port.entry_gate.release(own_process_id);
                if let Some(remaining) = meal_break_remaining(now) {
                    return StepResult::with_woken(
                        Suspend::Timeout(remaining),
                        woken.into_iter().collect(),
                    );
                }
                if port.dock_grain.level() == Tonnes::ZERO || port.current_ship.is_none() {
                    self.step = DedicatedStep::AwaitUnloadStarted;
                    return StepResult::with_woken(
                        Suspend::Wait(ResourceRef::UnloadStarted),
                        woken.into_iter().collect(),
                    );
                }
                let mut result = self.load_and_continue(own_process_id, port, cfg);
                result.woken.extend(woken);
                result
            }
            DedicatedStep::AwaitUnloadStarted => self.load_and_continue(own_process_id, port, cfg),
            DedicatedStep::AfterLoadChute => {
                let woken = port.chutes.release(own_process_id);
                self.step = DedicatedStep::AfterToWarehouseWait;
                StepResult::with_woken(Suspend::Timeout(cfg.t_to_warehouse), woken.into_iter().collect())
            }
            DedicatedStep::AfterToWarehouseWait => {
                self.unload_queue_start = now;
                self.step = DedicatedStep::AfterUnloadServerGranted;
                StepResult::new(Suspend::Wait(ResourceRef::WarehouseUnloadServer))
            }
            DedicatedStep::AfterUnloadServerGranted => {
                self.step = DedicatedStep::AfterExitWarehouseWait;
                StepResult::new(Suspend::Timeout(cfg.t_unload_warehouse))
            }
            DedicatedStep::AfterExitWarehouseWait => {
                let was_empty = warehouse.inventory.level() == Tonnes::ZERO;
                let mut woken = warehouse.inventory.put(self.payload);
                if was_empty && self.payload > Tonnes::ZERO {
                    woken.extend(warehouse.replenished.fire());
                }
                let inventory_after = warehouse.inventory.level();
                let queue_hours = to_f64(now - self.unload_queue_start) / 60.0;
                warehouse.events.push(WarehouseEventRow {
                    truck_label: self.id.label(),
                    queue_hours_at_warehouse: queue_hours,
                    unload_hours: to_f64(cfg.t_unload_warehouse) / 60.0,
                    load_hours: 0.0,
                    activity: WarehouseActivity::Unload,
                    tonnes_deposited: to_f64(self.payload),
                    tonnes_withdrawn: 0.0,
                    inventory_after: to_f64(inventory_after),
                });
                woken.extend(warehouse.unload_server.release(own_process_id));
                self.payload = Tonnes::ZERO;
                self.step = DedicatedStep::AwaitNoTrucksWaiting;
                StepResult::with_woken(Suspend::Timeout(cfg.t_exit_warehouse), woken)
            }
        }
    }
}

// ---------------------------------------------------------------------
// Warehouse-loading truck (§4.9)
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WarehouseTruckStep {
    RequestLoadServer,
    AfterLoadServerGranted,
    AfterReplenished,
    AfterLoadWait,
    AfterExitWait,
}

pub struct WarehouseTruckProcess {
    id: TruckId,
    capacity: Tonnes,
    payload: Tonnes,
    step: WarehouseTruckStep,
    queue_start: Minutes,
    queue_hours: f64,
}

impl WarehouseTruckProcess {
    pub fn new(id: TruckId, capacity: Tonnes) -> Self {
        Self {
            id,
            capacity,
            payload: Tonnes::ZERO,
            step: WarehouseTruckStep::RequestLoadServer,
            queue_start: Minutes::ZERO,
            queue_hours: 0.0,
        }
    }

    pub fn id(&self) -> TruckId {
        self.id
    }

    pub fn resume(
        &mut self,
        own_process_id: ProcessId,
        now: Minutes,
        warehouse: &mut Warehouse,
        cfg: &RunConfig,
    ) -> StepResult {
        match self.step {
            WarehouseTruckStep::RequestLoadServer => {
                self.queue_start = now;
                self.step = WarehouseTruckStep::AfterLoadServerGranted;
                StepResult::new(Suspend::Wait(ResourceRef::WarehouseLoadServer))
            }
            WarehouseTruckStep::AfterLoadServerGranted => {
                self.queue_hours = to_f64(now - self.queue_start) / 60.0;
                if warehouse.inventory.level() == Tonnes::ZERO {
                    self.step = WarehouseTruckStep::AfterReplenished;
                    return StepResult::new(Suspend::Wait(ResourceRef::WarehouseReplenished));
                }
                self.step = WarehouseTruckStep::AfterLoadWait;
                StepResult::new(Suspend::Timeout(cfg.t_load_warehouse))
            }
            WarehouseTruckStep::AfterReplenished => {
                self.step = WarehouseTruckStep::AfterLoadWait;
                StepResult::new(Suspend::Timeout(cfg.t_load_warehouse))
            }
            WarehouseTruckStep::AfterLoadWait => {
                let load = self.capacity.min(warehouse.inventory.level());
                let outcome = warehouse.inventory.get(own_process_id, load);
                debug_assert_eq!(outcome, crate::primitives::Outcome::Granted);
                self.payload = load;
                let inventory_after = warehouse.inventory.level();
                warehouse.events.push(WarehouseEventRow {
                    truck_label: self.id.label(),
                    queue_hours_at_warehouse: self.queue_hours,
                    unload_hours: 0.0,
                    load_hours: to_f64(cfg.t_load_warehouse) / 60.0,
                    activity: WarehouseActivity::Load,
                    tonnes_deposited: 0.0,
                    tonnes_withdrawn: to_f64(self.payload),
                    inventory_after: to_f64(inventory_after),
                });
                let woken = warehouse.load_server.release(own_process_id);
                self.step = WarehouseTruckStep::AfterExitWait;
                StepResult::with_woken(
                    Suspend::Timeout(cfg.t_exit_warehouse),
                    woken.into_iter().collect(),
                )
            }
            WarehouseTruckStep::AfterExitWait => StepResult::new(Suspend::Terminate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::minutes;

    #[test]
    fn meal_break_detects_each_window() {
        assert_eq!(meal_break_remaining(minutes(450.0)), Some(minutes(30.0)));
        assert_eq!(meal_break_remaining(minutes(800.0)), Some(minutes(40.0)));
        assert_eq!(meal_break_remaining(minutes(780.0)), Some(minutes(60.0)));
        assert_eq!(meal_break_remaining(minutes(779.0)), None);
        assert_eq!(meal_break_remaining(minutes(1400.0)), Some(minutes(40.0)));
        assert_eq!(meal_break_remaining(minutes(500.0)), None);
    }

    #[test]
    fn meal_break_wraps_across_days() {
        assert_eq!(
            meal_break_remaining(minutes(1440.0 + 780.0)),
            Some(minutes(60.0))
        );
    }

    #[test]
    fn should_fire_guard_respects_flag() {
        let mut port = Port::new();
        // Empty dock, not yet fired this cycle: should fire.
        assert!(should_fire_unload_finished(&port));
        port.unload_finished_fired_this_cycle = true;
        assert!(!should_fire_unload_finished(&port));
    }

    #[test]
    fn should_fire_guard_respects_dock_level() {
        let mut port = Port::new();
        port.dock_grain.put(Tonnes::from_num(5.0));
        assert!(!should_fire_unload_finished(&port));
    }

    #[test]
    fn ordinary_truck_entering_chute_at_780_suspends_sixty_minutes_with_no_load_taken() {
        use crate::id::TruckKind;
        use slotmap::SlotMap;

        let cfg = RunConfig::default();
        let mut port = Port::new();
        let mut procs: SlotMap<ProcessId, ()> = SlotMap::with_key();
        let pid = procs.insert(());
        port.entry_gate.request(pid);
        // Grain is available, but the meal-break guard must fire before any
        // of it is taken.
        port.dock_grain.put(Tonnes::from_num(1000.0));

        let mut truck = OrdinaryTruckProcess::new(TruckId::new(TruckKind::Ordinary, 1), Tonnes::from_num(25.0));

        // Walk the state machine up to the meal-break guard; the timing of
        // these earlier steps is immaterial to the check itself.
        truck.resume(pid, minutes(0.0), &mut port, &cfg); // RequestEntryGate
        truck.resume(pid, minutes(0.0), &mut port, &cfg); // WaitHalfGateIn1
        truck.resume(pid, minutes(0.0), &mut port, &cfg); // RequestChute
        truck.resume(pid, minutes(0.0), &mut port, &cfg); // WaitHalfGateIn2

        let result = truck.resume(pid, minutes(780.0), &mut port, &cfg);

        match result.suspend {
            Suspend::Timeout(remaining) => assert_eq!(remaining, minutes(60.0)),
            other => panic!("expected a 60-minute meal-break suspend, got {other:?}"),
        }
        assert_eq!(truck.payload, Tonnes::ZERO);
    }
}
