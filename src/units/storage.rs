use crate::units::types::{Unit, non_negative};

/// A capacity-bounded energy reservoir (battery bank, accumulator, crystal).
///
/// Holds `0 <= energy <= energy_capacity` at all times. All mutation goes
/// through [`StorageUnit::charge`], [`StorageUnit::discharge`] or
/// [`StorageUnit::set_energy`], each of which clamps instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageUnit {
    energy: f32,
    energy_capacity: f32,
}

impl StorageUnit {
    /// Creates an empty storage with the given capacity.
    ///
    /// A negative capacity is clamped to zero.
    pub fn new(energy_capacity: f32) -> Self {
        Self {
            energy: 0.0,
            energy_capacity: non_negative(energy_capacity),
        }
    }

    /// Creates a storage pre-charged to `energy`, clamped to `[0, capacity]`.
    pub fn with_energy(energy_capacity: f32, energy: f32) -> Self {
        let mut storage = Self::new(energy_capacity);
        storage.set_energy(energy);
        storage
    }

    /// Current stored energy.
    pub fn energy(&self) -> f32 {
        self.energy
    }

    /// Maximum stored energy.
    pub fn energy_capacity(&self) -> f32 {
        self.energy_capacity
    }

    /// Room left before the storage is full.
    pub fn headroom(&self) -> f32 {
        (self.energy_capacity - self.energy).max(0.0)
    }

    /// Energy that can be discharged right now.
    pub fn available(&self) -> f32 {
        self.energy.max(0.0)
    }

    /// Fraction of capacity in use (0.0 to 1.0). Zero-capacity storages report 0.
    pub fn fill_ratio(&self) -> f32 {
        if self.energy_capacity > 0.0 {
            (self.energy / self.energy_capacity).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Overwrites the stored energy, clamped to `[0, capacity]`.
    pub fn set_energy(&mut self, energy: f32) {
        self.energy = non_negative(energy).min(self.energy_capacity);
    }

    /// Changes the capacity, clamping both the capacity and the current charge.
    pub fn set_energy_capacity(&mut self, energy_capacity: f32) {
        self.energy_capacity = non_negative(energy_capacity);
        self.energy = self.energy.clamp(0.0, self.energy_capacity);
    }

    /// Adds up to `amount` energy and returns what was actually accepted.
    ///
    /// Negative amounts are treated as zero.
    pub fn charge(&mut self, amount: f32) -> f32 {
        let accepted = non_negative(amount).min(self.headroom());
        if accepted > 0.0 {
            self.energy = (self.energy + accepted).min(self.energy_capacity);
        }
        accepted
    }

    /// Removes up to `amount` energy and returns what was actually removed.
    ///
    /// Negative amounts are treated as zero.
    pub fn discharge(&mut self, amount: f32) -> f32 {
        let removed = non_negative(amount).min(self.available());
        if removed > 0.0 {
            self.energy = (self.energy - removed).max(0.0);
        }
        removed
    }

    /// Re-clamps both fields, replacing non-finite values with zero.
    pub(crate) fn sanitize(&mut self) {
        self.energy_capacity = non_negative(self.energy_capacity);
        self.energy = non_negative(self.energy).min(self.energy_capacity);
    }
}

impl Unit for StorageUnit {
    fn unit_type(&self) -> &'static str {
        "Storage"
    }
}
