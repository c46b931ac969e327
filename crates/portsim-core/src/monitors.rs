//! The two background processes that poll port state on a fixed period
//! rather than reacting to another process's resume (§4.11).

use crate::fixed::{minutes, Minutes};
use crate::port::{DailySnapshot, Port};
use crate::process::{StepResult, Suspend};

/// Checks every half minute whether the entry gate sits idle, and fires
/// `no_trucks_waiting` when it does — this is what lets a sleeping
/// dedicated truck notice the gate has gone quiet and make its attempt.
pub struct NoTrucksMonitor {
    interval: Minutes,
}

impl NoTrucksMonitor {
    pub fn new() -> Self {
        Self {
            interval: minutes(0.5),
        }
    }

    pub fn resume(&mut self, port: &mut Port) -> StepResult {
        let woken = if port.entry_gate.is_idle() {
            port.no_trucks_waiting.fire()
        } else {
            Vec::new()
        };
        StepResult::with_woken(Suspend::Timeout(self.interval), woken)
    }
}

impl Default for NoTrucksMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Appends one [`DailySnapshot`] every simulated day.
pub struct DailyMonitor {
    interval: Minutes,
    day: u32,
}

impl DailyMonitor {
    pub fn new() -> Self {
        Self {
            interval: crate::fixed::MINUTES_PER_DAY,
            day: 0,
        }
    }

    pub fn resume(&mut self, port: &mut Port) -> StepResult {
        port.daily_snapshots.push(DailySnapshot {
            day: self.day,
            roadstead_count: port.roadstead_length(),
            total_serviced: port.serviced_ships.len() as u32,
            total_lost: port.lost_ships,
        });
        self.day += 1;
        StepResult::new(Suspend::Timeout(self.interval))
    }
}

impl Default for DailyMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::Tonnes;

    #[test]
    fn no_trucks_monitor_fires_when_gate_idle() {
        let mut port = Port::new();
        let mut monitor = NoTrucksMonitor::new();
        let mut procs: slotmap::SlotMap<crate::id::ProcessId, ()> = slotmap::SlotMap::with_key();
        let waiter = procs.insert(());
        port.no_trucks_waiting.await_latch(waiter);
        let result = monitor.resume(&mut port);
        assert_eq!(result.woken, vec![waiter]);
        assert!(matches!(result.suspend, Suspend::Timeout(_)));
    }

    #[test]
    fn no_trucks_monitor_stays_quiet_when_gate_busy() {
        let mut port = Port::new();
        let mut procs: slotmap::SlotMap<crate::id::ProcessId, ()> = slotmap::SlotMap::with_key();
        let holder = procs.insert(());
        port.entry_gate.request(holder);
        let mut monitor = NoTrucksMonitor::new();
        let result = monitor.resume(&mut port);
        assert!(result.woken.is_empty());
    }

    #[test]
    fn daily_monitor_increments_day_and_records_snapshot() {
        let mut port = Port::new();
        port.lost_ships = 2;
        let ship_id = port.ships.insert(crate::ship::Ship::new(Tonnes::from_num(10.0), false));
        port.serviced_ships.push(ship_id);
        let mut monitor = DailyMonitor::new();
        monitor.resume(&mut port);
        monitor.resume(&mut port);
        assert_eq!(port.daily_snapshots.len(), 2);
        assert_eq!(port.daily_snapshots[0].day, 0);
        assert_eq!(port.daily_snapshots[1].day, 1);
        assert_eq!(port.daily_snapshots[0].total_lost, 2);
        assert_eq!(port.daily_snapshots[0].total_serviced, 1);
    }
}
