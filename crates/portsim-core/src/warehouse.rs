//! The optional inland warehouse, present iff the run configures at least
//! one dedicated truck.

use crate::fixed::Tonnes;
use crate::primitives::{CapacityServer, Latch, Reservoir};
use crate::results::WarehouseEventRow;

pub struct Warehouse {
    pub inventory: Reservoir,
    pub load_server: CapacityServer,
    pub unload_server: CapacityServer,
    pub replenished: Latch,
    pub events: Vec<WarehouseEventRow>,
}

impl Warehouse {
    /// Build a warehouse with `initial_grain` already in inventory. If
    /// `initial_grain > 0`, `replenished` starts pre-fired: since nothing
    /// is awaiting it yet at t=0, this only matters in that the first
    /// warehouse-truck generator cycle will see `inventory.level() > 0`
    /// and never need to wait on the latch at all.
    pub fn new(initial_grain: Tonnes) -> Self {
        Self {
            inventory: Reservoir::new(initial_grain),
            load_server: CapacityServer::new(1),
            unload_server: CapacityServer::new(1),
            replenished: Latch::new(),
            events: Vec::new(),
        }
    }
}
