/// In-order storage and source allocation helpers.
pub mod allocation;
pub mod engine;
/// Brownout and restore transitions.
pub mod event;
pub mod kpi;
pub mod network;
pub mod simulator;
pub mod snapshot;
pub mod types;

pub use engine::Engine;
pub use network::Network;
pub use simulator::{PowerSystemSimulator, SimulatorConfig};
pub use snapshot::SimulationSnapshot;
pub use types::{SimConfig, TickRecord, TickReport};
