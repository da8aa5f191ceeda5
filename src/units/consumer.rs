use crate::units::types::{Unit, non_negative};

/// A fixed- or variable-rate energy sink.
///
/// A consumer asks for `base_power_consumption * dt * level` energy each tick
/// and is told how much it actually received through
/// [`ConsumerUnit::apply_power`]. It never carries unmet demand into the next
/// tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumerUnit {
    /// Energy requested per second at level 1.0.
    pub base_power_consumption: f32,

    /// Intensity multiplier (e.g. a forge's heat setting). Defaults to 1.0.
    pub level: f32,

    last_supplied: f32,
    last_satisfaction: f32,
}

impl ConsumerUnit {
    /// Creates a consumer running at level 1.0.
    pub fn new(base_power_consumption: f32) -> Self {
        Self {
            base_power_consumption: non_negative(base_power_consumption),
            level: 1.0,
            last_supplied: 0.0,
            last_satisfaction: 1.0,
        }
    }

    /// Returns the consumer with an explicit level multiplier.
    pub fn with_level(mut self, level: f32) -> Self {
        self.level = non_negative(level);
        self
    }

    /// Energy requested for a tick of `delta_time` seconds.
    pub fn requested_energy(&self, delta_time: f32) -> f32 {
        non_negative(self.base_power_consumption * delta_time * self.level)
    }

    /// Records the energy delivered for the current tick.
    ///
    /// `requested` is the amount the simulator was asked for, used to derive
    /// the satisfaction ratio.
    pub fn apply_power(&mut self, energy: f32, requested: f32) {
        let energy = non_negative(energy);
        let requested = non_negative(requested);
        self.last_supplied = energy;
        self.last_satisfaction = if requested > 0.0 {
            (energy / requested).min(1.0)
        } else {
            1.0
        };
    }

    /// Energy delivered during the most recent powered tick.
    pub fn last_supplied(&self) -> f32 {
        self.last_supplied
    }

    /// Delivered / requested during the most recent powered tick.
    pub fn satisfaction(&self) -> f32 {
        self.last_satisfaction
    }

    /// Returns `true` if the last request was (almost) fully met.
    pub fn is_powered(&self) -> bool {
        self.last_satisfaction >= 1.0 - 1e-4
    }

    pub(crate) fn sanitize(&mut self) {
        self.base_power_consumption = non_negative(self.base_power_consumption);
        self.level = non_negative(self.level);
    }
}

impl Unit for ConsumerUnit {
    fn unit_type(&self) -> &'static str {
        "Consumer"
    }
}
