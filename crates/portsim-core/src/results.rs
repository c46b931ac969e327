//! The four output row types a run produces. All derive `serde::Serialize`
//! so a caller can hand them to whatever export or plotting layer it has;
//! this crate performs no file I/O of its own.

use serde::Serialize;

/// One row per ship that completed unload, excluding the pre-seeded
/// initial queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipServicedRow {
    pub ship_id: u64,
    pub queue_on_arrival: u32,
    pub tonnage: f64,
    pub arrival_min: f64,
    pub wait_days: f64,
    pub unload_days: f64,
    pub ordinary_trucks: u32,
    pub dedicated_trucks: u32,
    pub wait_hours: f64,
    pub unload_hours: f64,
}

/// One row per simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoadsteadSnapshotRow {
    pub day: u32,
    pub roadstead_count: u32,
    pub total_serviced: u32,
    pub total_lost: u32,
}

/// One row per warehouse movement (load or unload), present only when the
/// run configures a warehouse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarehouseEventRow {
    pub truck_label: String,
    pub queue_hours_at_warehouse: f64,
    pub unload_hours: f64,
    pub load_hours: f64,
    pub activity: WarehouseActivity,
    pub tonnes_deposited: f64,
    pub tonnes_withdrawn: f64,
    pub inventory_after: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WarehouseActivity {
    Load,
    Unload,
}

/// Single-row echo of the run's configured parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParametersRow {
    pub years: u32,
    pub dedicated_trucks: u32,
    pub initial_grain: f64,
    pub dedicated_capacity: f64,
    pub warehouse_probability: f64,
    pub initial_queued_ships: u32,
    pub seed: u64,
}

/// Everything a run produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunOutcome {
    pub ships_serviced: Vec<ShipServicedRow>,
    pub roadstead_daily: Vec<RoadsteadSnapshotRow>,
    pub warehouse_events: Vec<WarehouseEventRow>,
    pub parameters: Option<ParametersRow>,
}

impl Default for ParametersRow {
    fn default() -> Self {
        Self {
            years: 0,
            dedicated_trucks: 0,
            initial_grain: 0.0,
            dedicated_capacity: 0.0,
            warehouse_probability: 0.0,
            initial_queued_ships: 0,
            seed: 0,
        }
    }
}
