//! Empirical sampling: uniform with-replacement draws from a historical
//! column, and the three-shift calendar used to pick a truck's
//! inter-arrival rate.

use crate::error::DataError;
use crate::fixed::{clamp_non_negative, Minutes, MINUTES_PER_DAY};
use crate::rng::SimRng;

/// A non-empty historical column sampled with replacement. Used for ship
/// tonnage, ship pre-unload delay, and truck capacity — all fixed-point
/// quantities, so one generic column type serves all three.
#[derive(Debug, Clone)]
pub struct EmpiricalColumn {
    values: Vec<Minutes>,
    name: &'static str,
}

impl EmpiricalColumn {
    /// Build a column. Rejects an empty `values`: an empty empirical
    /// distribution must abort before scheduling starts, not at the first
    /// sample attempt.
    pub fn new(name: &'static str, values: Vec<Minutes>) -> Result<Self, DataError> {
        if values.is_empty() {
            return Err(DataError::EmptyColumnAtRuntime { column: name });
        }
        Ok(Self { values, name })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Draw one value uniformly at random, with replacement. Clamped to
    /// non-negative per §4.13 -- the historical `ship_delay` column can
    /// legitimately contain negative rows (`unload_start_time` recorded
    /// before `first_line_time`), and a negative sampled duration must
    /// never reach the scheduler as a negative timeout.
    pub fn sample(&self, rng: &mut SimRng) -> Minutes {
        let idx = rng.uniform_index(self.values.len());
        clamp_non_negative(self.values[idx])
    }
}

/// Which 8-hour shift a moment-of-day falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shift {
    /// 08:00-16:00
    First,
    /// 16:00-00:00
    Second,
    /// 00:00-08:00
    Third,
}

impl Shift {
    pub fn index(self) -> usize {
        match self {
            Shift::First => 0,
            Shift::Second => 1,
            Shift::Third => 2,
        }
    }
}

/// Classify virtual time `now` into its shift, wrapping on the simulated
/// calendar day.
pub fn shift_of(now: Minutes) -> Shift {
    let minute_of_day = now % MINUTES_PER_DAY;
    if minute_of_day >= Minutes::from_num(480.0) && minute_of_day < Minutes::from_num(960.0) {
        Shift::First
    } else if minute_of_day >= Minutes::from_num(960.0) {
        Shift::Second
    } else {
        Shift::Third
    }
}

/// Per-shift truck inter-arrival rates, `λ_shift[s]` in trucks per minute.
#[derive(Debug, Clone, Copy)]
pub struct ShiftRates {
    rates: [f64; 3],
}

impl ShiftRates {
    pub fn new(first: f64, second: f64, third: f64) -> Self {
        Self {
            rates: [first, second, third],
        }
    }

    pub fn rate(&self, shift: Shift) -> f64 {
        self.rates[shift.index()]
    }
}

/// The validated sampling inputs a run needs: built once by `portsim-data`
/// from the two historical row collections and handed to
/// [`crate::simulation::Simulation::new`]. Every column here is guaranteed
/// non-empty, so sampling from it at runtime cannot raise
/// [`crate::error::DataError`].
#[derive(Debug, Clone)]
pub struct SimulationInputs {
    /// `λ_ship`, already scaled by `ship_rate_factor`, in arrivals/minute.
    pub ship_arrival_rate: f64,
    pub shift_rates: ShiftRates,
    pub ship_tonnage: EmpiricalColumn,
    pub ship_delay: EmpiricalColumn,
    pub truck_capacity: EmpiricalColumn,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::minutes;

    #[test]
    fn empty_column_is_rejected() {
        let err = EmpiricalColumn::new("tonnage", vec![]).unwrap_err();
        assert!(matches!(err, DataError::EmptyColumnAtRuntime { .. }));
    }

    #[test]
    fn sample_only_returns_seen_values() {
        let col = EmpiricalColumn::new("tonnage", vec![minutes(1.0), minutes(2.0), minutes(3.0)])
            .unwrap();
        let mut rng = SimRng::new(7);
        for _ in 0..50 {
            let v = col.sample(&mut rng);
            assert!(v == minutes(1.0) || v == minutes(2.0) || v == minutes(3.0));
        }
    }

    #[test]
    fn shift_boundaries() {
        assert_eq!(shift_of(minutes(0.0)), Shift::Third);
        assert_eq!(shift_of(minutes(479.999)), Shift::Third);
        assert_eq!(shift_of(minutes(480.0)), Shift::First);
        assert_eq!(shift_of(minutes(959.999)), Shift::First);
        assert_eq!(shift_of(minutes(960.0)), Shift::Second);
        assert_eq!(shift_of(minutes(1439.999)), Shift::Second);
    }

    #[test]
    fn shift_wraps_across_days() {
        assert_eq!(shift_of(minutes(1440.0)), Shift::Third);
        assert_eq!(shift_of(minutes(1440.0 + 480.0)), Shift::First);
    }

    #[test]
    fn sample_clamps_negative_values_to_zero() {
        let col = EmpiricalColumn::new("delay", vec![minutes(-15.0), minutes(0.0), minutes(10.0)])
            .unwrap();
        let mut rng = SimRng::new(3);
        for _ in 0..50 {
            let v = col.sample(&mut rng);
            assert!(v >= Minutes::ZERO);
            assert!(v == minutes(0.0) || v == minutes(10.0));
        }
    }

    #[test]
    fn shift_rates_indexed_correctly() {
        let rates = ShiftRates::new(0.1, 0.2, 0.3);
        assert_eq!(rates.rate(Shift::First), 0.1);
        assert_eq!(rates.rate(Shift::Second), 0.2);
        assert_eq!(rates.rate(Shift::Third), 0.3);
    }
}
