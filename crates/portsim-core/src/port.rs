//! The port entity: berth, gates, chutes, the dockside grain reservoir,
//! the latches coordinating ships and trucks, and the bookkeeping the
//! driver reads back at the end of a run.

use slotmap::SlotMap;

use crate::fixed::Tonnes;
use crate::id::ShipId;
use crate::primitives::{CapacityServer, Latch, Reservoir};
use crate::ship::Ship;

const CHUTE_CAPACITY: u32 = 5;

/// One day's roadstead occupancy sample (§4.11).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySnapshot {
    pub day: u32,
    pub roadstead_count: u32,
    pub total_serviced: u32,
    pub total_lost: u32,
}

pub struct Port {
    pub berth: CapacityServer,
    pub entry_gate: CapacityServer,
    pub exit_gate: CapacityServer,
    pub chutes: CapacityServer,
    pub dock_grain: Reservoir,

    pub trucks_may_arrive: Latch,
    pub unload_started: Latch,
    pub unload_finished: Latch,
    pub no_trucks_waiting: Latch,

    /// Guards against both an ordinary and a dedicated truck firing
    /// `unload_finished` for the same emptied-dock instant; reset when a
    /// new unload cycle begins (`dump_cargo`, §4.6 step 7).
    pub unload_finished_fired_this_cycle: bool,

    pub current_ship: Option<ShipId>,
    pub ships: SlotMap<ShipId, Ship>,

    pub lost_ships: u32,
    pub serviced_ships: Vec<ShipId>,
    pub daily_snapshots: Vec<DailySnapshot>,
}

impl Port {
    pub fn new() -> Self {
        Self {
            berth: CapacityServer::new(1),
            entry_gate: CapacityServer::new(1),
            exit_gate: CapacityServer::new(1),
            chutes: CapacityServer::new(CHUTE_CAPACITY),
            dock_grain: Reservoir::new(Tonnes::ZERO),

            trucks_may_arrive: Latch::new(),
            unload_started: Latch::new(),
            unload_finished: Latch::new(),
            no_trucks_waiting: Latch::new(),

            unload_finished_fired_this_cycle: false,

            current_ship: None,
            ships: SlotMap::with_key(),

            lost_ships: 0,
            serviced_ships: Vec::new(),
            daily_snapshots: Vec::new(),
        }
    }

    /// Current roadstead length: ships queued at the berth plus the one
    /// (if any) actively holding it.
    pub fn roadstead_length(&self) -> u32 {
        self.berth.active_count() + self.berth.queue_length() as u32
    }
}

impl Default for Port {
    fn default() -> Self {
        Self::new()
    }
}
