use crate::units::types::{Unit, non_negative, unit_ratio};

/// Fuel remaining below this threshold is treated as exhausted.
const FUEL_EPSILON: f32 = 1e-6;

/// A fuel-burning energy generator.
///
/// A source never produces energy on its own: the simulator first asks how
/// much it *could* produce this tick ([`SourceUnit::peek_energy_output`]) and
/// only burns fuel for the energy that was actually drawn
/// ([`SourceUnit::commit_energy_used`]).
///
/// # Examples
///
/// ```
/// use powernet_sim::units::SourceUnit;
///
/// let mut generator = SourceUnit::new(10.0, 10.0, 1.0).with_fuel(5.0);
/// // One fuel unit per tick at a 2x engine scale is worth 20 energy.
/// assert_eq!(generator.peek_energy_output(1.0, 2.0), 20.0);
/// assert_eq!(generator.commit_energy_used(20.0, 2.0), 1.0);
/// assert_eq!(generator.fuel_level(), 4.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SourceUnit {
    fuel: f32,
    fuel_capacity: f32,

    /// Energy produced per unit of fuel at full efficiency.
    pub fuel_energy_yield: f32,

    fuel_efficiency: f32,

    /// Whether the generator is switched on. Stopped sources produce nothing.
    pub is_running: bool,
}

impl SourceUnit {
    /// Creates an empty, running generator.
    ///
    /// # Arguments
    ///
    /// * `fuel_capacity` - Maximum fuel the generator holds (clamped to >= 0)
    /// * `fuel_energy_yield` - Energy per fuel unit (clamped to >= 0)
    /// * `fuel_efficiency` - Multiplier applied to the yield (clamped to 0..=1)
    pub fn new(fuel_capacity: f32, fuel_energy_yield: f32, fuel_efficiency: f32) -> Self {
        Self {
            fuel: 0.0,
            fuel_capacity: non_negative(fuel_capacity),
            fuel_energy_yield: non_negative(fuel_energy_yield),
            fuel_efficiency: unit_ratio(fuel_efficiency),
            is_running: true,
        }
    }

    /// Returns the generator loaded with `fuel`, clamped to capacity.
    pub fn with_fuel(mut self, fuel: f32) -> Self {
        self.set_fuel(fuel);
        self
    }

    /// Returns the generator with its running flag set.
    pub fn running(mut self, is_running: bool) -> Self {
        self.is_running = is_running;
        self
    }

    /// Current stored fuel.
    pub fn fuel_level(&self) -> f32 {
        self.fuel
    }

    /// Maximum stored fuel.
    pub fn fuel_capacity(&self) -> f32 {
        self.fuel_capacity
    }

    /// Efficiency multiplier (0.0 to 1.0).
    pub fn fuel_efficiency(&self) -> f32 {
        self.fuel_efficiency
    }

    /// Sets the efficiency multiplier, clamped to 0..=1.
    pub fn set_fuel_efficiency(&mut self, fuel_efficiency: f32) {
        self.fuel_efficiency = unit_ratio(fuel_efficiency);
    }

    /// Overwrites the stored fuel, clamped to `[0, fuel_capacity]`.
    pub fn set_fuel(&mut self, fuel: f32) {
        self.fuel = non_negative(fuel).min(self.fuel_capacity);
    }

    /// Adds up to `amount` fuel and returns what was actually accepted.
    pub fn add_fuel(&mut self, amount: f32) -> f32 {
        let room = (self.fuel_capacity - self.fuel).max(0.0);
        let accepted = non_negative(amount).min(room);
        self.fuel += accepted;
        accepted
    }

    /// Energy one unit of fuel is worth before engine scaling.
    pub fn energy_per_fuel(&self) -> f32 {
        self.fuel_energy_yield * self.fuel_efficiency
    }

    /// Returns `true` if the generator could produce energy this tick.
    pub fn can_produce(&self) -> bool {
        self.is_running && self.fuel > 0.0 && self.energy_per_fuel() > 0.0
    }

    /// Energy the generator could deliver this tick without touching its fuel.
    ///
    /// # Arguments
    ///
    /// * `max_fuel` - Most fuel the generator may burn this tick
    /// * `energy_scale` - Engine multiplier applied on top of `energy_per_fuel`
    pub fn peek_energy_output(&self, max_fuel: f32, energy_scale: f32) -> f32 {
        if !self.can_produce() {
            return 0.0;
        }
        let burnable = self.fuel.min(non_negative(max_fuel));
        burnable * self.energy_per_fuel() * non_negative(energy_scale)
    }

    /// Burns the fuel needed for `energy` and returns the fuel consumed.
    ///
    /// Never burns more than the generator holds. Callers are expected to pass
    /// no more energy than [`SourceUnit::peek_energy_output`] reported.
    pub fn commit_energy_used(&mut self, energy: f32, energy_scale: f32) -> f32 {
        let per_fuel = self.energy_per_fuel() * non_negative(energy_scale);
        let energy = non_negative(energy);
        if per_fuel <= 0.0 || energy <= 0.0 {
            return 0.0;
        }

        let burned = (energy / per_fuel).min(self.fuel);
        self.fuel -= burned;
        if self.fuel < FUEL_EPSILON {
            self.fuel = 0.0;
        }
        burned
    }

    /// Re-clamps every field, replacing non-finite values with zero.
    pub(crate) fn sanitize(&mut self) {
        self.fuel_capacity = non_negative(self.fuel_capacity);
        self.fuel = non_negative(self.fuel).min(self.fuel_capacity);
        self.fuel_energy_yield = non_negative(self.fuel_energy_yield);
        self.fuel_efficiency = unit_ratio(self.fuel_efficiency);
    }
}

impl Unit for SourceUnit {
    fn unit_type(&self) -> &'static str {
        "Source"
    }
}
