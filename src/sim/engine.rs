//! Simulation engine that drives one network tick by tick.

use log::{debug, info, trace, warn};

use super::event::{BrownoutTracker, NetworkEvent};
use super::network::Network;
use super::simulator::PowerSystemSimulator;
use super::types::{SimConfig, TickRecord};
use crate::profile::LoadProfile;
use crate::roster::{PlayerRoster, SharedRoster};

/// Owns a network, its load profiles, and the player roster its conduits use.
///
/// The engine is the host: it updates consumer levels between ticks, builds
/// the snapshot, and records what the simulator reports.
pub struct Engine {
    config: SimConfig,
    simulator: PowerSystemSimulator,
    network: Network,
    profiles: Vec<Option<LoadProfile>>,
    roster: SharedRoster,
    brownout: BrownoutTracker,
}

impl Engine {
    /// Creates a new engine.
    ///
    /// # Arguments
    ///
    /// * `config` - Tick length, run length, and seed
    /// * `simulator` - Allocation engine with its tuning
    /// * `network` - Units to simulate
    /// * `roster` - Player pools shared with the network's conduits
    pub fn new(
        config: SimConfig,
        simulator: PowerSystemSimulator,
        network: Network,
        roster: SharedRoster,
    ) -> Self {
        let profiles = vec![None; network.consumers.len()];
        debug!("engine built: {:?}", network.composition());
        Self {
            config,
            simulator,
            network,
            profiles,
            roster,
            brownout: BrownoutTracker::default(),
        }
    }

    /// Creates an engine with an empty roster.
    pub fn without_players(
        config: SimConfig,
        simulator: PowerSystemSimulator,
        network: Network,
    ) -> Self {
        Self::new(config, simulator, network, PlayerRoster::new().shared())
    }

    /// Attaches a level profile to the consumer at `index`.
    ///
    /// Returns `false` if there is no such consumer.
    pub fn set_profile(&mut self, index: usize, profile: LoadProfile) -> bool {
        if index >= self.network.consumers.len() {
            return false;
        }
        if self.profiles.len() < self.network.consumers.len() {
            self.profiles.resize(self.network.consumers.len(), None);
        }
        self.profiles[index] = Some(profile);
        true
    }

    /// Executes one tick and returns its record.
    pub fn step(&mut self, tick: usize) -> TickRecord {
        for (consumer, profile) in self.network.consumers.iter_mut().zip(&mut self.profiles) {
            if let Some(profile) = profile {
                consumer.level = profile.level_at(tick);
            }
        }

        let report = {
            let mut snapshot = self.network.snapshot(self.config.delta_time);
            snapshot.sanitize();
            trace!(
                "t={tick} sanitized snapshot: {} sources, {} storages, {} consumers, {} conduits",
                snapshot.sources.len(),
                snapshot.storages.len(),
                snapshot.consumers.len(),
                snapshot.conduits.len(),
            );
            self.simulator.simulate(&mut snapshot)
        };

        let mut events = Vec::new();
        if let Some(event) = self.brownout.observe(tick, &report) {
            match event {
                NetworkEvent::Brownout { .. } => warn!("{event}"),
                NetworkEvent::Restored { .. } => info!("{event}"),
            }
            events.push(event);
        }

        let record = TickRecord {
            tick,
            time_s: tick as f32 * self.config.delta_time,
            report,
            total_fuel: self.network.total_fuel(),
            total_player_energy: self.roster.borrow().total_energy(),
            events,
        };
        debug!("{record}");
        record
    }

    /// Executes all ticks and returns the complete record vector.
    pub fn run(&mut self) -> Vec<TickRecord> {
        let total = self.config.ticks;
        let mut records = Vec::with_capacity(total);
        for tick in 0..total {
            records.push(self.step(tick));
        }
        let brownouts = records.iter().filter(|r| r.report.is_brownout()).count();
        info!(
            "run complete: {total} ticks, {brownouts} in brownout, {:.2} energy stored",
            self.network.total_stored_energy()
        );
        records
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn simulator(&self) -> &PowerSystemSimulator {
        &self.simulator
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    pub fn roster(&self) -> &SharedRoster {
        &self.roster
    }

    /// Returns `true` if the last simulated tick left demand unserved.
    pub fn in_brownout(&self) -> bool {
        self.brownout.is_brownout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::PlayerPool;
    use crate::units::{ConduitMode, ConduitUnit, ConsumerUnit, SourceUnit, StorageUnit};
    use std::rc::Rc;

    fn engine_with(network: Network, ticks: usize) -> Engine {
        Engine::without_players(
            SimConfig::new(1.0, ticks, 0),
            PowerSystemSimulator::default(),
            network,
        )
    }

    #[test]
    fn run_produces_one_record_per_tick() {
        let mut network = Network::new();
        network.storages.push(StorageUnit::with_energy(100.0, 100.0));
        network.consumers.push(ConsumerUnit::new(5.0));
        let mut engine = engine_with(network, 7);

        let records = engine.run();

        assert_eq!(records.len(), 7);
        assert_eq!(records[3].tick, 3);
        assert_eq!(records[3].time_s, 3.0);
        assert_eq!(engine.network().total_stored_energy(), 65.0);
    }

    #[test]
    fn brownout_and_restore_are_recorded_once() {
        let mut network = Network::new();
        network.storages.push(StorageUnit::with_energy(100.0, 12.0));
        network.consumers.push(ConsumerUnit::new(5.0));
        let mut engine = engine_with(network, 4);
        // Tick 2 only has 2 left; tick 3 is idle so demand is met again.
        engine.set_profile(0, LoadProfile::constant(1.0));

        let r0 = engine.step(0);
        let r1 = engine.step(1);
        let r2 = engine.step(2);
        assert!(r0.events.is_empty());
        assert!(r1.events.is_empty());
        assert_eq!(
            r2.events,
            vec![NetworkEvent::Brownout {
                tick: 2,
                deficit: 3.0
            }]
        );
        assert!(engine.in_brownout());

        engine.network_mut().consumers[0].level = 0.0;
        engine.profiles[0] = None;
        let r3 = engine.step(3);
        assert_eq!(r3.events, vec![NetworkEvent::Restored { tick: 3 }]);
    }

    #[test]
    fn profiles_drive_consumer_levels() {
        let mut network = Network::new();
        network.storages.push(StorageUnit::with_energy(100.0, 100.0));
        network.consumers.push(ConsumerUnit::new(10.0));
        let mut engine = engine_with(network, 1);
        assert!(engine.set_profile(0, LoadProfile::constant(0.5)));
        assert!(!engine.set_profile(1, LoadProfile::constant(0.5)));

        let record = engine.step(0);

        assert_eq!(record.report.demand, 5.0);
    }

    #[test]
    fn roster_energy_is_reported() {
        let mut roster = PlayerRoster::new();
        roster.insert(1, PlayerPool::new(0.0, 100.0));
        let roster = roster.shared();

        let mut network = Network::new();
        network.sources.push(SourceUnit::new(10.0, 10.0, 1.0).with_fuel(10.0));
        network.conduits.push(
            ConduitUnit::new(ConduitMode::Charge, 10.0)
                .with_access(Rc::clone(&roster))
                .with_players([1]),
        );
        let mut engine = Engine::new(
            SimConfig::new(1.0, 2, 0),
            PowerSystemSimulator::default(),
            network,
            roster,
        );

        let records = engine.run();

        assert_eq!(records[0].total_player_energy, 10.0);
        assert_eq!(records[1].total_player_energy, 20.0);
    }
}
