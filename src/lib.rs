//! Deterministic fixed-step power network simulator.
//!
//! Fuel-burning sources, storages, consumers and player conduits are
//! simulated one tick at a time by [`sim::simulator::PowerSystemSimulator`].

pub mod config;
pub mod io;
/// Consumer level profiles.
pub mod profile;
pub mod roster;
pub mod scenario;
/// Simulation engine, allocation, events, and KPI modules.
pub mod sim;
/// Unit records and the player energy ledger.
pub mod units;
