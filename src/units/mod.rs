//! Unit records for power network participants.

/// Player-energy bridges.
pub mod conduit;
/// Demand-based energy sinks.
pub mod consumer;
pub mod ledger;
/// Fuel-burning generators.
pub mod source;
/// Capacity-bounded reservoirs.
pub mod storage;
pub mod types;

// Re-export the main types for convenience
pub use conduit::{ConduitMode, ConduitUnit};
pub use consumer::ConsumerUnit;
pub use ledger::{PlayerEnergyFns, PlayerEnergyLedger, PlayerEnergySource, PlayerId};
pub use source::SourceUnit;
pub use storage::StorageUnit;
pub use types::Unit;
