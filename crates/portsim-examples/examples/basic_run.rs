//! Basic run example: ingest synthetic historical data, run one simulated
//! year, and print the summary KPIs.
//!
//! Run with: `cargo run -p portsim-examples --example basic_run`

use portsim_core::config::RunConfig;
use portsim_core::simulation::Simulation;
use portsim_data::{build_simulation_inputs, ShipObservation, TruckObservation};

/// A plausible-looking historical ship table: unload durations and
/// inter-arrival gaps spread around the filter thresholds so the ingest
/// step has something to actually filter.
fn sample_ships() -> Vec<ShipObservation> {
    (0..80)
        .map(|i| {
            let spread = (i % 10) as f64;
            ShipObservation {
                unload_duration_hours: 55.0 + spread * 3.0,
                inter_arrival_hours: 18.0 + spread * 2.0,
                wait_hours: 4.0 + spread,
                total_stoppages_hours: 1.0,
                equipment_shortage_hours: 0.0,
                tonnage: 9_000 + (i as u32 % 12) * 500,
                unload_start_time: Some(8.0 + spread * 0.25),
                first_line_time: Some(8.0),
            }
        })
        .collect()
}

/// A plausible-looking historical truck table, split evenly across the
/// three shifts.
fn sample_trucks() -> Vec<TruckObservation> {
    (0..60)
        .map(|i| TruckObservation {
            year: 2023,
            shift: (i % 3) as u8 + 1,
            minutes_between_trucks: 15.0 + (i % 5) as f64 * 2.0,
            capacity: 22.0 + (i % 4) as f64 * 1.5,
        })
        .collect()
}

fn main() {
    let cfg = RunConfig::default();

    let inputs = build_simulation_inputs(&sample_ships(), &sample_trucks(), cfg.ship_rate_factor)
        .expect("sample data passes the domain filters");

    let sim = Simulation::new(cfg, inputs).expect("default config validates");
    let outcome = sim.run().expect("run completes within its horizon");

    let summary = portsim_stats::summarize(&outcome);

    println!("=== Basic run (no warehouse) ===\n");
    println!("ships serviced:        {}", summary.ships_serviced);
    println!("ships lost (roadstead full): {}", summary.lost_ships);
    println!("mean wait (hours):     {:.2}", summary.mean_wait_hours);
    println!("mean unload (hours):   {:.2}", summary.mean_unload_hours);
    println!("p50 wait (hours):      {:.2}", summary.wait_hours_p50);
    println!("p90 wait (hours):      {:.2}", summary.wait_hours_p90);
    println!(
        "mean ordinary trucks per ship: {:.2}",
        summary.mean_ordinary_trucks_per_ship
    );

    println!("\nlast few daily snapshots:");
    for row in summary.daily_trend.iter().rev().take(5).rev() {
        println!(
            "  day {:>4}: serviced={:<3} lost={}",
            row.day, row.serviced_that_day, row.lost_that_day
        );
    }
}
