//! Row types for the two historical datasets the core engine is calibrated
//! against. Parsing a CSV/spreadsheet into these rows is the external
//! caller's job; this crate only ever sees already-structured values.

use serde::{Deserialize, Serialize};

/// One historical truck observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TruckObservation {
    pub year: u32,
    /// 1, 2, or 3.
    pub shift: u8,
    pub minutes_between_trucks: f64,
    pub capacity: f64,
}

/// One historical ship observation.
///
/// `unload_start_time` and `first_line_time` are hour-of-day timestamps
/// (e.g. `14.5` for 14:30); both must be present to derive `delay_minutes`
/// for a row, otherwise that row's delay is treated as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipObservation {
    pub unload_duration_hours: f64,
    pub inter_arrival_hours: f64,
    pub wait_hours: f64,
    pub total_stoppages_hours: f64,
    pub equipment_shortage_hours: f64,
    pub tonnage: u32,
    #[serde(default)]
    pub unload_start_time: Option<f64>,
    #[serde(default)]
    pub first_line_time: Option<f64>,
}

impl ShipObservation {
    /// `(unload_start_time - first_line_time) * 60`, or `0` if either
    /// timestamp is absent.
    pub fn delay_minutes(&self) -> f64 {
        match (self.unload_start_time, self.first_line_time) {
            (Some(start), Some(first_line)) => (start - first_line) * 60.0,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_minutes_computed_when_both_timestamps_present() {
        let row = ShipObservation {
            unload_duration_hours: 50.0,
            inter_arrival_hours: 20.0,
            wait_hours: 1.0,
            total_stoppages_hours: 0.0,
            equipment_shortage_hours: 0.0,
            tonnage: 1000,
            unload_start_time: Some(14.5),
            first_line_time: Some(14.0),
        };
        assert!((row.delay_minutes() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn delay_minutes_zero_when_timestamps_missing() {
        let row = ShipObservation {
            unload_duration_hours: 50.0,
            inter_arrival_hours: 20.0,
            wait_hours: 1.0,
            total_stoppages_hours: 0.0,
            equipment_shortage_hours: 0.0,
            tonnage: 1000,
            unload_start_time: None,
            first_line_time: None,
        };
        assert_eq!(row.delay_minutes(), 0.0);
    }
}
