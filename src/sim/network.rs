//! Owned storage for one network's units.

use std::collections::BTreeMap;

use super::snapshot::SimulationSnapshot;
use crate::units::{ConduitUnit, ConsumerUnit, SourceUnit, StorageUnit, Unit};

/// All units attached to a single power network.
///
/// Lists are kept in insertion order; that order is the allocation priority
/// the simulator uses.
#[derive(Debug, Default)]
pub struct Network {
    pub sources: Vec<SourceUnit>,
    pub storages: Vec<StorageUnit>,
    pub consumers: Vec<ConsumerUnit>,
    pub conduits: Vec<ConduitUnit>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrows every unit list into a snapshot for one tick.
    pub fn snapshot(&mut self, delta_time: f32) -> SimulationSnapshot<'_> {
        SimulationSnapshot::new(delta_time)
            .with_sources(&mut self.sources)
            .with_storages(&mut self.storages)
            .with_consumers(&mut self.consumers)
            .with_conduits(&mut self.conduits)
    }

    pub fn unit_count(&self) -> usize {
        self.sources.len() + self.storages.len() + self.consumers.len() + self.conduits.len()
    }

    /// Unit counts keyed by unit type, e.g. `"Storage" => 2`.
    pub fn composition(&self) -> BTreeMap<&'static str, usize> {
        let units = self
            .sources
            .iter()
            .map(|u| u as &dyn Unit)
            .chain(self.storages.iter().map(|u| u as &dyn Unit))
            .chain(self.consumers.iter().map(|u| u as &dyn Unit))
            .chain(self.conduits.iter().map(|u| u as &dyn Unit));
        let mut counts = BTreeMap::new();
        for unit in units {
            *counts.entry(unit.unit_type()).or_insert(0) += 1;
        }
        counts
    }

    pub fn total_fuel(&self) -> f32 {
        self.sources.iter().map(SourceUnit::fuel_level).sum()
    }

    pub fn total_stored_energy(&self) -> f32 {
        self.storages.iter().map(StorageUnit::energy).sum()
    }

    pub fn total_storage_capacity(&self) -> f32 {
        self.storages.iter().map(StorageUnit::energy_capacity).sum()
    }
}
