//! Filtering and derivation: turns the two historical row collections into
//! a [`SimulationInputs`] the core engine can sample from.
//!
//! This is the one place `ConfigError::EmptyFilteredData` is raised for the
//! sampling inputs: once a `SimulationInputs` exists, every column it holds
//! is non-empty, so sampling from it at runtime can never fail.

use portsim_core::error::ConfigError;
use portsim_core::fixed::minutes;
use portsim_core::samplers::{EmpiricalColumn, ShiftRates, SimulationInputs};

use crate::observations::{ShipObservation, TruckObservation};

const MAX_RETAINED_SHIPS: usize = 250;

/// Keep ships with a plausible unload duration and inter-arrival gap, then
/// retain only the most recent [`MAX_RETAINED_SHIPS`] of what remains.
fn filter_ships(ships: &[ShipObservation]) -> Vec<ShipObservation> {
    let filtered: Vec<ShipObservation> = ships
        .iter()
        .copied()
        .filter(|s| s.unload_duration_hours > 30.0 && s.unload_duration_hours < 140.0)
        .filter(|s| s.inter_arrival_hours < 450.0)
        .collect();

    let start = filtered.len().saturating_sub(MAX_RETAINED_SHIPS);
    filtered[start..].to_vec()
}

/// Keep trucks from recent years with a plausible capacity.
fn filter_trucks(trucks: &[TruckObservation]) -> Vec<TruckObservation> {
    trucks
        .iter()
        .copied()
        .filter(|t| t.year > 2022 && t.capacity > 20.0)
        .collect()
}

fn mean(values: impl Iterator<Item = f64> + Clone) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Column name for the per-shift truck inter-arrival data, used only in
/// error messages (shift index is 0-based, matching
/// [`portsim_core::samplers::Shift::index`]).
fn shift_column_name(shift_index: usize) -> &'static str {
    match shift_index {
        0 => "minutes_between_trucks (shift 1)",
        1 => "minutes_between_trucks (shift 2)",
        _ => "minutes_between_trucks (shift 3)",
    }
}

fn empirical_column(name: &'static str, values: Vec<portsim_core::fixed::Minutes>) -> EmpiricalColumn {
    EmpiricalColumn::new(name, values).expect("non-empty: checked by caller before construction")
}

/// Build the validated sampling inputs a run needs from the two historical
/// row collections, applying the domain filters and deriving `λ_ship` and
/// the per-shift `λ_shift` table.
///
/// # Errors
///
/// Returns [`ConfigError::EmptyFilteredData`] if either table is empty
/// after filtering, or if a shift has no retained truck observations.
pub fn build_simulation_inputs(
    ships: &[ShipObservation],
    trucks: &[TruckObservation],
    ship_rate_factor: f64,
) -> Result<SimulationInputs, ConfigError> {
    let ships = filter_ships(ships);
    if ships.is_empty() {
        return Err(ConfigError::EmptyFilteredData { column: "ships" });
    }

    let trucks = filter_trucks(trucks);
    if trucks.is_empty() {
        return Err(ConfigError::EmptyFilteredData { column: "trucks" });
    }

    let mean_inter_arrival_minutes = mean(ships.iter().map(|s| s.inter_arrival_hours * 60.0))
        .expect("non-empty: checked above");
    let ship_arrival_rate = ship_rate_factor * (1.0 / mean_inter_arrival_minutes);

    let ship_tonnage = empirical_column(
        "tonnage",
        ships.iter().map(|s| minutes(s.tonnage as f64)).collect(),
    );
    let ship_delay = empirical_column(
        "delay_minutes",
        ships.iter().map(|s| minutes(s.delay_minutes())).collect(),
    );

    let mut shift_rates = [0.0_f64; 3];
    for (shift_index, rate) in shift_rates.iter_mut().enumerate() {
        let shift_number = shift_index as u8 + 1;
        let group_mean = mean(trucks
            .iter()
            .filter(|t| t.shift == shift_number)
            .map(|t| t.minutes_between_trucks))
        .ok_or(ConfigError::EmptyFilteredData {
            column: shift_column_name(shift_index),
        })?;
        *rate = 1.0 / group_mean;
    }

    let truck_capacity = empirical_column(
        "capacity",
        trucks.iter().map(|t| minutes(t.capacity)).collect(),
    );

    Ok(SimulationInputs {
        ship_arrival_rate,
        shift_rates: ShiftRates::new(shift_rates[0], shift_rates[1], shift_rates[2]),
        ship_tonnage,
        ship_delay,
        truck_capacity,
    })
}
