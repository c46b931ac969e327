//! Historical-data ingestion for the port simulation engine.
//!
//! This crate owns the two input row types ([`ShipObservation`],
//! [`TruckObservation`]) and the domain filters and empirical-distribution
//! derivation described by the core engine's sampling contract. It turns
//! already-parsed historical rows into a
//! [`portsim_core::samplers::SimulationInputs`] bundle that
//! [`portsim_core::simulation::Simulation::new`] consumes directly.
//!
//! Parsing a CSV/spreadsheet into [`ShipObservation`]/[`TruckObservation`]
//! rows is the caller's responsibility; this crate never touches the
//! filesystem.
//!
//! # Usage
//!
//! ```rust,ignore
//! use portsim_data::build_simulation_inputs;
//!
//! let inputs = build_simulation_inputs(&ships, &trucks, cfg.ship_rate_factor)?;
//! let sim = portsim_core::simulation::Simulation::new(cfg, inputs)?;
//! let outcome = sim.run()?;
//! ```

pub mod ingest;
pub mod observations;

pub use ingest::build_simulation_inputs;
pub use observations::{ShipObservation, TruckObservation};
