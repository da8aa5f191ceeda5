//! Builds a runnable engine from a validated scenario.

use std::rc::Rc;

use crate::config::{ConfigError, ProfileConfig, ScenarioConfig};
use crate::profile::LoadProfile;
use crate::roster::{PlayerPool, PlayerRoster};
use crate::sim::engine::Engine;
use crate::sim::network::Network;
use crate::sim::simulator::PowerSystemSimulator;
use crate::sim::types::SimConfig;
use crate::units::{ConduitUnit, ConsumerUnit, SourceUnit, StorageUnit};

/// Seed offset between consecutive consumer profiles so their noise is uncorrelated.
const PROFILE_SEED_STRIDE: u64 = 57;

/// Validates `cfg` and builds an engine ready to run.
///
/// Every conduit shares one roster holding the scenario's `[[players]]`.
///
/// # Errors
///
/// Returns every validation error if the scenario is invalid.
pub fn build_engine(cfg: &ScenarioConfig) -> Result<Engine, Vec<ConfigError>> {
    let errors = cfg.validate();
    if !errors.is_empty() {
        return Err(errors);
    }

    let s = &cfg.simulation;
    let sim_config = SimConfig::new(s.delta_time, s.ticks, s.seed);

    let mut roster = PlayerRoster::new();
    for p in &cfg.players {
        roster.insert(p.id, PlayerPool::new(p.energy, p.capacity));
    }
    let roster = roster.shared();

    let mut network = Network::new();
    network.sources = cfg
        .sources
        .iter()
        .map(|src| {
            SourceUnit::new(src.fuel_capacity, src.fuel_energy_yield, src.fuel_efficiency)
                .with_fuel(src.fuel)
                .running(src.running)
        })
        .collect();
    network.storages = cfg
        .storages
        .iter()
        .map(|st| StorageUnit::with_energy(st.energy_capacity, st.energy))
        .collect();
    network.consumers = cfg
        .consumers
        .iter()
        .map(|c| ConsumerUnit::new(c.base_power_consumption).with_level(c.level))
        .collect();
    network.conduits = cfg
        .conduits
        .iter()
        .map(|c| {
            let conduit = ConduitUnit::new(c.mode, c.transfer_rate)
                .with_access(Rc::clone(&roster))
                .with_players(c.players.iter().copied());
            match c.estimated_demand {
                Some(estimate) => conduit.with_demand_estimator(move || estimate),
                None => conduit,
            }
        })
        .collect();

    let mut engine = Engine::new(
        sim_config,
        PowerSystemSimulator::new(cfg.simulator),
        network,
        roster,
    );
    for (i, c) in cfg.consumers.iter().enumerate() {
        if let Some(p) = &c.profile {
            let seed = s.seed.wrapping_add(PROFILE_SEED_STRIDE * i as u64);
            engine.set_profile(i, build_profile(p, seed));
        }
    }
    Ok(engine)
}

fn build_profile(p: &ProfileConfig, seed: u64) -> LoadProfile {
    match p.model.as_str() {
        "sine" => LoadProfile::sine(
            p.base,
            p.amplitude,
            p.period_ticks,
            p.phase_rad,
            p.noise_std,
            seed,
        ),
        _ => LoadProfile::constant(p.level),
    }
}
