//! Result summarisation for the port simulation engine.
//!
//! Computes scalar KPIs over a finished run's four output tables: mean and
//! percentile wait/unload time, mean trucks per ship, a daily
//! serviced/lost trend, and (when a warehouse was configured) final
//! inventory and per-activity movement counts.
//!
//! This crate performs no I/O and produces no report text -- it hands back
//! plain numbers for whatever reporting layer the caller has.
//!
//! # Usage
//!
//! ```ignore
//! let outcome = sim.run()?;
//! let summary = portsim_stats::summarize(&outcome);
//! println!("mean wait: {:.1}h", summary.mean_wait_hours);
//! ```

use portsim_core::results::{RunOutcome, WarehouseActivity};

/// Per-day arrivals derived from two consecutive cumulative snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTrend {
    pub day: u32,
    pub serviced_that_day: u32,
    pub lost_that_day: u32,
}

/// Warehouse-specific KPIs, present only when the run used a warehouse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarehouseSummary {
    pub final_inventory: f64,
    pub load_events: usize,
    pub unload_events: usize,
    pub total_tonnes_deposited: f64,
    pub total_tonnes_withdrawn: f64,
}

/// Scalar summary of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub ships_serviced: u32,
    pub lost_ships: u32,
    pub mean_wait_hours: f64,
    pub mean_unload_hours: f64,
    pub wait_hours_p50: f64,
    pub wait_hours_p90: f64,
    pub mean_ordinary_trucks_per_ship: f64,
    pub mean_dedicated_trucks_per_ship: f64,
    pub daily_trend: Vec<DailyTrend>,
    pub warehouse: Option<WarehouseSummary>,
}

fn mean(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 { 0.0 } else { sum / count as f64 }
}

fn percentile(values: &mut [f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let rank = ((p / 100.0) * (values.len() - 1) as f64).round() as usize;
    values[rank.min(values.len() - 1)]
}

/// Summarize a finished run's output tables into scalar KPIs.
pub fn summarize(outcome: &RunOutcome) -> Summary {
    let ships_serviced = outcome.ships_serviced.len() as u32;
    let lost_ships = outcome
        .roadstead_daily
        .last()
        .map(|row| row.total_lost)
        .unwrap_or(0);

    let mean_wait_hours = mean(outcome.ships_serviced.iter().map(|s| s.wait_hours));
    let mean_unload_hours = mean(outcome.ships_serviced.iter().map(|s| s.unload_hours));

    let mut wait_hours: Vec<f64> = outcome.ships_serviced.iter().map(|s| s.wait_hours).collect();
    let wait_hours_p50 = percentile(&mut wait_hours, 50.0);
    let wait_hours_p90 = percentile(&mut wait_hours, 90.0);

    let mean_ordinary_trucks_per_ship =
        mean(outcome.ships_serviced.iter().map(|s| s.ordinary_trucks as f64));
    let mean_dedicated_trucks_per_ship =
        mean(outcome.ships_serviced.iter().map(|s| s.dedicated_trucks as f64));

    Summary {
        ships_serviced,
        lost_ships,
        mean_wait_hours,
        mean_unload_hours,
        wait_hours_p50,
        wait_hours_p90,
        mean_ordinary_trucks_per_ship,
        mean_dedicated_trucks_per_ship,
        daily_trend: daily_trend(outcome),
        warehouse: warehouse_summary(outcome),
    }
}

/// `RoadsteadSnapshotRow` totals are cumulative-to-date; this differences
/// consecutive days to recover per-day counts.
fn daily_trend(outcome: &RunOutcome) -> Vec<DailyTrend> {
    let mut trend = Vec::with_capacity(outcome.roadstead_daily.len());
    let (mut prev_serviced, mut prev_lost) = (0u32, 0u32);
    for row in &outcome.roadstead_daily {
        trend.push(DailyTrend {
            day: row.day,
            serviced_that_day: row.total_serviced.saturating_sub(prev_serviced),
            lost_that_day: row.total_lost.saturating_sub(prev_lost),
        });
        prev_serviced = row.total_serviced;
        prev_lost = row.total_lost;
    }
    trend
}

fn warehouse_summary(outcome: &RunOutcome) -> Option<WarehouseSummary> {
    if outcome.warehouse_events.is_empty() {
        return None;
    }
    let final_inventory = outcome
        .warehouse_events
        .last()
        .map(|e| e.inventory_after)
        .unwrap_or(0.0);
    let load_events = outcome
        .warehouse_events
        .iter()
        .filter(|e| e.activity == WarehouseActivity::Load)
        .count();
    let unload_events = outcome.warehouse_events.len() - load_events;
    let total_tonnes_deposited = outcome.warehouse_events.iter().map(|e| e.tonnes_deposited).sum();
    let total_tonnes_withdrawn = outcome.warehouse_events.iter().map(|e| e.tonnes_withdrawn).sum();

    Some(WarehouseSummary {
        final_inventory,
        load_events,
        unload_events,
        total_tonnes_deposited,
        total_tonnes_withdrawn,
    })
}
