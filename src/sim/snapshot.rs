//! Per-tick view over one network's live unit records.

use crate::units::{ConduitUnit, ConsumerUnit, SourceUnit, StorageUnit};

/// The unit of work handed to [`PowerSystemSimulator::simulate`].
///
/// A snapshot borrows the caller's records for the duration of one tick and
/// is dropped afterwards; the simulator mutates the records in place.
///
/// # Examples
///
/// ```
/// use powernet_sim::sim::simulator::PowerSystemSimulator;
/// use powernet_sim::sim::snapshot::SimulationSnapshot;
/// use powernet_sim::units::StorageUnit;
///
/// let mut storages = [StorageUnit::new(100.0)];
/// let mut snapshot = SimulationSnapshot::new(1.0).with_storages(&mut storages);
/// PowerSystemSimulator::default().simulate(&mut snapshot);
/// assert_eq!(storages[0].energy(), 0.0);
/// ```
///
/// [`PowerSystemSimulator::simulate`]: crate::sim::simulator::PowerSystemSimulator::simulate
#[derive(Debug)]
pub struct SimulationSnapshot<'a> {
    /// Tick length in seconds.
    pub delta_time: f32,
    pub sources: &'a mut [SourceUnit],
    pub storages: &'a mut [StorageUnit],
    pub consumers: &'a mut [ConsumerUnit],
    pub conduits: &'a mut [ConduitUnit],
}

impl<'a> SimulationSnapshot<'a> {
    /// Creates a snapshot with no units.
    pub fn new(delta_time: f32) -> Self {
        Self {
            delta_time,
            sources: &mut [],
            storages: &mut [],
            consumers: &mut [],
            conduits: &mut [],
        }
    }

    pub fn with_sources(self, sources: &'a mut [SourceUnit]) -> Self {
        Self { sources, ..self }
    }

    pub fn with_storages(self, storages: &'a mut [StorageUnit]) -> Self {
        Self { storages, ..self }
    }

    pub fn with_consumers(self, consumers: &'a mut [ConsumerUnit]) -> Self {
        Self { consumers, ..self }
    }

    pub fn with_conduits(self, conduits: &'a mut [ConduitUnit]) -> Self {
        Self { conduits, ..self }
    }

    /// Returns `true` if the snapshot holds no units at all.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
            && self.storages.is_empty()
            && self.consumers.is_empty()
            && self.conduits.is_empty()
    }

    /// Returns `true` if `delta_time` describes a tick that can be simulated.
    pub fn has_valid_delta_time(&self) -> bool {
        self.delta_time.is_finite() && self.delta_time > 0.0
    }

    /// Total energy held across all storages.
    pub fn total_stored_energy(&self) -> f32 {
        self.storages.iter().map(StorageUnit::energy).sum()
    }

    /// Total storage capacity.
    pub fn total_storage_capacity(&self) -> f32 {
        self.storages.iter().map(StorageUnit::energy_capacity).sum()
    }

    /// Total fuel held across all sources.
    pub fn total_fuel(&self) -> f32 {
        self.sources.iter().map(SourceUnit::fuel_level).sum()
    }

    /// Replaces non-finite numbers with zero and re-clamps every unit bound.
    ///
    /// A non-finite `delta_time` becomes zero, which makes the tick a no-op.
    pub fn sanitize(&mut self) {
        if !self.delta_time.is_finite() {
            self.delta_time = 0.0;
        }
        for source in self.sources.iter_mut() {
            source.sanitize();
        }
        for storage in self.storages.iter_mut() {
            storage.sanitize();
        }
        for consumer in self.consumers.iter_mut() {
            consumer.sanitize();
        }
        for conduit in self.conduits.iter_mut() {
            conduit.sanitize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_snapshot_is_empty() {
        let snapshot = SimulationSnapshot::new(1.0);
        assert!(snapshot.is_empty());
        assert!(snapshot.has_valid_delta_time());
    }

    #[test]
    fn totals_sum_units() {
        let mut storages = [
            StorageUnit::with_energy(100.0, 10.0),
            StorageUnit::with_energy(50.0, 5.0),
        ];
        let mut sources = [SourceUnit::new(10.0, 1.0, 1.0).with_fuel(3.0)];
        let snapshot = SimulationSnapshot::new(1.0)
            .with_storages(&mut storages)
            .with_sources(&mut sources);
        assert_eq!(snapshot.total_stored_energy(), 15.0);
        assert_eq!(snapshot.total_storage_capacity(), 150.0);
        assert_eq!(snapshot.total_fuel(), 3.0);
    }

    #[test]
    fn sanitize_zeroes_nan_delta_time() {
        let mut consumers = [ConsumerUnit::new(f32::NAN)];
        let mut snapshot = SimulationSnapshot::new(f32::NAN).with_consumers(&mut consumers);
        snapshot.sanitize();
        assert_eq!(snapshot.delta_time, 0.0);
        assert!(!snapshot.has_valid_delta_time());
        assert_eq!(consumers[0].base_power_consumption, 0.0);
    }
}
