//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::config::RunConfig;
use crate::fixed::minutes;
use crate::samplers::{EmpiricalColumn, ShiftRates, SimulationInputs};

/// A small but non-degenerate set of sampling inputs: a handful of distinct
/// values per column, so tests can observe variation without needing a real
/// historical dataset.
pub fn sample_inputs() -> SimulationInputs {
    SimulationInputs {
        ship_arrival_rate: 0.01,
        shift_rates: ShiftRates::new(0.05, 0.04, 0.03),
        ship_tonnage: EmpiricalColumn::new(
            "tonnage",
            vec![minutes(8000.0), minutes(12000.0), minutes(15000.0)],
        )
        .unwrap(),
        ship_delay: EmpiricalColumn::new(
            "delay",
            vec![minutes(0.0), minutes(30.0), minutes(90.0)],
        )
        .unwrap(),
        truck_capacity: EmpiricalColumn::new("capacity", vec![minutes(20.0), minutes(25.0)])
            .unwrap(),
    }
}

/// A one-year run config with a fixed seed, no warehouse.
pub fn sample_config(seed: u64) -> RunConfig {
    let mut cfg = RunConfig::default();
    cfg.seed = seed;
    cfg
}

/// Same as [`sample_config`], but with a warehouse and `n` dedicated trucks.
pub fn sample_config_with_warehouse(seed: u64, dedicated_trucks: u32) -> RunConfig {
    let mut cfg = sample_config(seed);
    cfg.dedicated_trucks = dedicated_trucks;
    cfg.dedicated_capacity = minutes(30.0);
    cfg.initial_grain = minutes(500.0);
    cfg.warehouse_probability = 0.4;
    cfg
}
