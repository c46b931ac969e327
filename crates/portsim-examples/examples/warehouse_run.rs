//! Warehouse run example: same historical data as `basic_run`, but with a
//! dedicated-truck warehouse configured, demonstrating the
//! load/unload/inventory KPIs that only exist when a warehouse runs.
//!
//! Run with: `cargo run -p portsim-examples --example warehouse_run`

use portsim_core::config::RunConfig;
use portsim_core::fixed::minutes;
use portsim_core::simulation::Simulation;
use portsim_data::{build_simulation_inputs, ShipObservation, TruckObservation};

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
    let mut cfg = RunConfig::default();
    cfg.dedicated_trucks = 3;
    cfg.dedicated_capacity = minutes(28.0);
    cfg.initial_grain = minutes(2_000.0);
    cfg.warehouse_probability = 0.35;

    let inputs = build_simulation_inputs(&sample_ships(), &sample_trucks(), cfg.ship_rate_factor)
        .expect("sample data passes the domain filters");

    let sim = Simulation::new(cfg, inputs).expect("warehouse config validates");
    let outcome = sim.run().expect("run completes within its horizon");

    let summary = portsim_stats::summarize(&outcome);

    println!("=== Warehouse run (3 dedicated trucks) ===\n");
    println!("ships serviced: {}", summary.ships_serviced);
    println!("mean wait (hours): {:.2}", summary.mean_wait_hours);
    println!(
        "mean dedicated trucks per ship: {:.2}",
        summary.mean_dedicated_trucks_per_ship
    );

    match summary.warehouse {
        Some(w) => {
            println!("\nwarehouse KPIs:");
            println!("  final inventory (tonnes): {:.1}", w.final_inventory);
            println!("  load events:   {}", w.load_events);
            println!("  unload events: {}", w.unload_events);
            println!("  tonnes deposited: {:.1}", w.total_tonnes_deposited);
            println!("  tonnes withdrawn: {:.1}", w.total_tonnes_withdrawn);
        }
        None => println!("\nno warehouse activity recorded (unexpected for this config)"),
    }
}
