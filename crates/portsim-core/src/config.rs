//! Run configuration. Every tunable constant lives on [`RunConfig`]; there
//! is no global mutable state, so two independently configured runs on the
//! same process never interfere.

use crate::error::ConfigError;
use crate::fixed::{minutes, Minutes};

/// All tunable constants and run parameters for one simulation run.
/// Defaults match the documented historical defaults; callers override
/// only the fields a given scenario needs to change.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub t_gate_in: Minutes,
    pub t_gate_out: Minutes,
    pub t_load_chute: Minutes,
    pub t_mooring_total: Minutes,
    pub t_mooring_pre_trucks: Minutes,
    pub t_to_warehouse: Minutes,
    pub t_unload_warehouse: Minutes,
    pub t_load_warehouse: Minutes,
    pub t_exit_warehouse: Minutes,
    pub max_roadstead: u32,
    pub ship_rate_factor: f64,

    pub years: u32,
    pub dedicated_trucks: u32,
    pub initial_grain: Minutes,
    pub dedicated_capacity: Minutes,
    pub warehouse_probability: f64,
    pub initial_queued_ships: u32,
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            t_gate_in: minutes(2.0),
            t_gate_out: minutes(8.16),
            t_load_chute: minutes(7.28),
            t_mooring_total: minutes(462.0),
            t_mooring_pre_trucks: minutes(440.0),
            t_to_warehouse: minutes(3.0),
            t_unload_warehouse: minutes(6.0),
            t_load_warehouse: minutes(6.0),
            t_exit_warehouse: minutes(2.0),
            max_roadstead: 8,
            ship_rate_factor: 1.08,

            years: 1,
            dedicated_trucks: 0,
            initial_grain: Minutes::ZERO,
            dedicated_capacity: minutes(30.0),
            warehouse_probability: 0.0,
            initial_queued_ships: 0,
            seed: 0,
        }
    }
}

impl RunConfig {
    /// `T_mooring_total - T_mooring_pre_trucks`, the wait duration for the
    /// ship's `berth_remainder` step.
    pub fn t_mooring_remainder(&self) -> Minutes {
        self.t_mooring_total - self.t_mooring_pre_trucks
    }

    pub fn horizon(&self) -> Minutes {
        crate::fixed::MINUTES_PER_YEAR * minutes(f64::from(self.years))
    }

    /// Validate every constraint from the error taxonomy's `ConfigError`
    /// variants. The sole place `ConfigError` is raised for this struct.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("t_gate_in", self.t_gate_in),
            ("t_gate_out", self.t_gate_out),
            ("t_load_chute", self.t_load_chute),
            ("t_mooring_total", self.t_mooring_total),
            ("t_mooring_pre_trucks", self.t_mooring_pre_trucks),
            ("t_to_warehouse", self.t_to_warehouse),
            ("t_unload_warehouse", self.t_unload_warehouse),
            ("t_load_warehouse", self.t_load_warehouse),
            ("t_exit_warehouse", self.t_exit_warehouse),
        ];
        for (name, value) in non_negative {
            if value < Minutes::ZERO {
                return Err(ConfigError::NegativeTimeConstant {
                    name,
                    value: crate::fixed::to_f64(value).to_string(),
                });
            }
        }

        if self.t_mooring_pre_trucks > self.t_mooring_total {
            return Err(ConfigError::NegativeTimeConstant {
                name: "t_mooring_total - t_mooring_pre_trucks",
                value: crate::fixed::to_f64(self.t_mooring_remainder()).to_string(),
            });
        }

        if self.max_roadstead < 1 {
            return Err(ConfigError::InvalidMaxRoadstead(self.max_roadstead));
        }

        if self.years == 0 {
            return Err(ConfigError::InvalidYears(self.years.to_string()));
        }

        if self.dedicated_trucks > 0 && self.dedicated_capacity <= Minutes::ZERO {
            return Err(ConfigError::InvalidDedicatedCapacity(
                crate::fixed::to_f64(self.dedicated_capacity).to_string(),
            ));
        }

        if self.initial_grain < Minutes::ZERO {
            return Err(ConfigError::InvalidInitialGrain(
                crate::fixed::to_f64(self.initial_grain).to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.warehouse_probability) {
            return Err(ConfigError::InvalidWarehouseProbability(
                self.warehouse_probability.to_string(),
            ));
        }

        Ok(())
    }
}
