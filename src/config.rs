//! TOML-based scenario configuration and preset definitions.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::sim::simulator::SimulatorConfig;
use crate::units::{ConduitMode, PlayerId};

/// Top-level scenario configuration parsed from TOML.
///
/// Unit tables are ordered: their order in the file is the allocation
/// priority used by the simulator. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or use one of the built-in presets.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Run timing and seed.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Engine-level tuning.
    #[serde(default)]
    pub simulator: SimulatorConfig,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub storages: Vec<StorageConfig>,
    #[serde(default)]
    pub consumers: Vec<ConsumerConfig>,
    #[serde(default)]
    pub conduits: Vec<ConduitConfig>,
    /// Player pools reachable through conduits.
    #[serde(default)]
    pub players: Vec<PlayerConfig>,
}

/// Run timing and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Tick length in seconds (must be > 0).
    pub delta_time: f32,
    /// Number of ticks to run (must be > 0).
    pub ticks: usize,
    /// Master random seed for load profiles.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            delta_time: 1.0,
            ticks: 24,
            seed: 42,
        }
    }
}

/// A fuel-burning generator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub fuel: f32,
    pub fuel_capacity: f32,
    /// Energy per fuel unit before efficiency and scaling.
    pub fuel_energy_yield: f32,
    /// Efficiency (0.0–1.0).
    pub fuel_efficiency: f32,
    pub running: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            fuel: 0.0,
            fuel_capacity: 100.0,
            fuel_energy_yield: 10.0,
            fuel_efficiency: 1.0,
            running: true,
        }
    }
}

/// An energy buffer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub energy: f32,
    pub energy_capacity: f32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            energy: 0.0,
            energy_capacity: 100.0,
        }
    }
}

/// A load with an optional level profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsumerConfig {
    /// Power drawn at level 1.0.
    pub base_power_consumption: f32,
    /// Initial level multiplier.
    pub level: f32,
    pub profile: Option<ProfileConfig>,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            base_power_consumption: 1.0,
            level: 1.0,
            profile: None,
        }
    }
}

/// Load profile parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileConfig {
    /// Profile model: `"constant"` or `"sine"`.
    pub model: String,
    /// Level for the constant model.
    pub level: f32,
    /// Mean level for the sine model.
    pub base: f32,
    /// Sine amplitude.
    pub amplitude: f32,
    /// Ticks per sine cycle (must be > 0).
    pub period_ticks: usize,
    /// Phase offset (radians).
    pub phase_rad: f32,
    /// Gaussian noise standard deviation.
    pub noise_std: f32,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            model: "constant".to_string(),
            level: 1.0,
            base: 1.0,
            amplitude: 0.5,
            period_ticks: 24,
            phase_rad: 0.0,
            noise_std: 0.0,
        }
    }
}

/// A player energy bridge.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConduitConfig {
    /// `"charge"` (network to players) or `"drain"` (players to network).
    pub mode: ConduitMode,
    /// Most energy per second exchanged with each player.
    pub transfer_rate: f32,
    /// Connected player ids; each must appear in `[[players]]`.
    #[serde(default)]
    pub players: Vec<PlayerId>,
    /// Fixed demand estimate reported instead of `transfer_rate * players`.
    #[serde(default)]
    pub estimated_demand: Option<f32>,
}

/// A player's starting pool.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerConfig {
    pub id: PlayerId,
    #[serde(default)]
    pub energy: f32,
    pub capacity: f32,
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"storages[0].energy"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Returns the idle preset: a half-full storage and nothing else.
    pub fn idle() -> Self {
        Self {
            storages: vec![StorageConfig {
                energy: 50.0,
                energy_capacity: 100.0,
            }],
            ..Self::default()
        }
    }

    /// Returns the baseline preset: one generator, one battery, two loads.
    pub fn baseline() -> Self {
        Self {
            sources: vec![SourceConfig {
                fuel: 50.0,
                fuel_efficiency: 0.9,
                ..SourceConfig::default()
            }],
            storages: vec![StorageConfig {
                energy: 50.0,
                energy_capacity: 200.0,
            }],
            consumers: vec![
                ConsumerConfig {
                    base_power_consumption: 5.0,
                    profile: Some(ProfileConfig {
                        model: "sine".to_string(),
                        base: 1.0,
                        amplitude: 0.5,
                        noise_std: 0.05,
                        ..ProfileConfig::default()
                    }),
                    ..ConsumerConfig::default()
                },
                ConsumerConfig {
                    base_power_consumption: 3.0,
                    ..ConsumerConfig::default()
                },
            ],
            ..Self::default()
        }
    }

    /// Returns the scarcity preset: little fuel, a small battery, heavy loads.
    pub fn scarcity() -> Self {
        Self {
            sources: vec![SourceConfig {
                fuel: 5.0,
                ..SourceConfig::default()
            }],
            storages: vec![StorageConfig {
                energy: 30.0,
                energy_capacity: 50.0,
            }],
            consumers: vec![
                ConsumerConfig {
                    base_power_consumption: 10.0,
                    ..ConsumerConfig::default()
                },
                ConsumerConfig {
                    base_power_consumption: 6.0,
                    ..ConsumerConfig::default()
                },
            ],
            ..Self::default()
        }
    }

    /// Returns the player-exchange preset: charge and drain conduits around a battery.
    pub fn player_exchange() -> Self {
        Self {
            sources: vec![SourceConfig {
                fuel: 40.0,
                ..SourceConfig::default()
            }],
            storages: vec![StorageConfig {
                energy: 20.0,
                energy_capacity: 150.0,
            }],
            consumers: vec![ConsumerConfig {
                base_power_consumption: 4.0,
                ..ConsumerConfig::default()
            }],
            conduits: vec![
                ConduitConfig {
                    mode: ConduitMode::Charge,
                    transfer_rate: 5.0,
                    players: vec![1, 2],
                    estimated_demand: None,
                },
                ConduitConfig {
                    mode: ConduitMode::Drain,
                    transfer_rate: 3.0,
                    players: vec![3],
                    estimated_demand: None,
                },
            ],
            players: vec![
                PlayerConfig {
                    id: 1,
                    energy: 0.0,
                    capacity: 100.0,
                },
                PlayerConfig {
                    id: 2,
                    energy: 50.0,
                    capacity: 100.0,
                },
                PlayerConfig {
                    id: 3,
                    energy: 80.0,
                    capacity: 100.0,
                },
            ],
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["idle", "baseline", "scarcity", "player_exchange"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "idle" => Ok(Self::idle()),
            "baseline" => Ok(Self::baseline()),
            "scarcity" => Ok(Self::scarcity()),
            "player_exchange" => Ok(Self::player_exchange()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid, names an unknown
    /// conduit mode, or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns every violation found.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.simulation;
        if !(s.delta_time.is_finite() && s.delta_time > 0.0) {
            errors.push(ConfigError::new("simulation.delta_time", "must be > 0"));
        }
        if s.ticks == 0 {
            errors.push(ConfigError::new("simulation.ticks", "must be > 0"));
        }

        let sim = &self.simulator;
        non_negative(&mut errors, "simulator.fuel_burn_rate", sim.fuel_burn_rate);
        non_negative(&mut errors, "simulator.fuel_energy_scale", sim.fuel_energy_scale);

        for (i, src) in self.sources.iter().enumerate() {
            let at = |field: &str| format!("sources[{i}].{field}");
            non_negative(&mut errors, at("fuel_capacity"), src.fuel_capacity);
            within(&mut errors, at("fuel"), src.fuel, src.fuel_capacity, "fuel_capacity");
            non_negative(&mut errors, at("fuel_energy_yield"), src.fuel_energy_yield);
            within(&mut errors, at("fuel_efficiency"), src.fuel_efficiency, 1.0, "1.0");
        }

        for (i, st) in self.storages.iter().enumerate() {
            let at = |field: &str| format!("storages[{i}].{field}");
            non_negative(&mut errors, at("energy_capacity"), st.energy_capacity);
            within(&mut errors, at("energy"), st.energy, st.energy_capacity, "energy_capacity");
        }

        for (i, c) in self.consumers.iter().enumerate() {
            let at = |field: &str| format!("consumers[{i}].{field}");
            non_negative(
                &mut errors,
                at("base_power_consumption"),
                c.base_power_consumption,
            );
            non_negative(&mut errors, at("level"), c.level);
            if let Some(p) = &c.profile {
                match p.model.as_str() {
                    "constant" => non_negative(&mut errors, at("profile.level"), p.level),
                    "sine" => {
                        if p.period_ticks == 0 {
                            errors.push(ConfigError::new(at("profile.period_ticks"), "must be > 0"));
                        }
                        non_negative(&mut errors, at("profile.noise_std"), p.noise_std);
                    }
                    other => errors.push(ConfigError::new(
                        at("profile.model"),
                        format!("must be \"constant\" or \"sine\", got \"{other}\""),
                    )),
                }
            }
        }

        let mut known = BTreeSet::new();
        for (i, p) in self.players.iter().enumerate() {
            let at = |field: &str| format!("players[{i}].{field}");
            if !known.insert(p.id) {
                errors.push(ConfigError::new(at("id"), format!("duplicate player id {}", p.id)));
            }
            non_negative(&mut errors, at("capacity"), p.capacity);
            within(&mut errors, at("energy"), p.energy, p.capacity, "capacity");
        }

        for (i, c) in self.conduits.iter().enumerate() {
            let at = |field: &str| format!("conduits[{i}].{field}");
            non_negative(&mut errors, at("transfer_rate"), c.transfer_rate);
            if let Some(estimate) = c.estimated_demand {
                non_negative(&mut errors, at("estimated_demand"), estimate);
            }
            for id in &c.players {
                if !known.contains(id) {
                    errors.push(ConfigError::new(
                        at("players"),
                        format!("player {id} is not listed in [[players]]"),
                    ));
                }
            }
        }

        errors
    }
}

fn non_negative(errors: &mut Vec<ConfigError>, field: impl Into<String>, value: f32) {
    if !(value.is_finite() && value >= 0.0) {
        errors.push(ConfigError::new(field, "must be >= 0"));
    }
}

fn within(errors: &mut Vec<ConfigError>, field: impl Into<String>, value: f32, max: f32, bound: &str) {
    if !(value.is_finite() && (0.0..=max).contains(&value)) {
        errors.push(ConfigError::new(field, format!("must be in [0, {bound}]")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let message = err.err().map(|e| e.message).unwrap_or_default();
        assert!(message.contains("unknown preset"));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
delta_time = 0.5
ticks = 48
seed = 99

[simulator]
fuel_burn_rate = 2.0

[[sources]]
fuel = 10.0
fuel_capacity = 20.0
fuel_energy_yield = 8.0
fuel_efficiency = 0.75

[[storages]]
energy = 5.0
energy_capacity = 50.0

[[consumers]]
base_power_consumption = 3.0

[consumers.profile]
model = "sine"
base = 1.0
amplitude = 0.3
period_ticks = 12

[[conduits]]
mode = "drain"
transfer_rate = 4.0
players = [7]
estimated_demand = 2.5

[[players]]
id = 7
energy = 30.0
capacity = 60.0
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.unwrap_or_default();
        assert_eq!(cfg.simulation.ticks, 48);
        assert_eq!(cfg.simulator.fuel_burn_rate, 2.0);
        // Untouched tuning keeps its default.
        assert_eq!(cfg.simulator.fuel_energy_scale, 2.0);
        assert_eq!(cfg.sources[0].fuel_efficiency, 0.75);
        assert!(cfg.sources[0].running);
        assert_eq!(
            cfg.consumers[0].profile.as_ref().map(|p| p.model.as_str()),
            Some("sine")
        );
        assert_eq!(cfg.conduits[0].mode, ConduitMode::Drain);
        assert_eq!(cfg.conduits[0].estimated_demand, Some(2.5));
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let toml = r#"
[simulation]
ticks = 24
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn unknown_conduit_mode_is_rejected() {
        let toml = r#"
[[conduits]]
mode = "sideways"
transfer_rate = 1.0
"#;
        let err = ScenarioConfig::from_toml_str(toml).err();
        assert_eq!(err.map(|e| e.field), Some("toml".to_string()));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg = ScenarioConfig::from_toml_str("[simulation]\nseed = 7\n").unwrap_or_default();
        assert_eq!(cfg.simulation.seed, 7);
        assert_eq!(cfg.simulation.ticks, 24);
        assert_eq!(cfg.simulation.delta_time, 1.0);
        assert!(cfg.sources.is_empty());
    }

    #[test]
    fn validation_catches_bad_timing() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.delta_time = 0.0;
        cfg.simulation.ticks = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.delta_time"));
        assert!(errors.iter().any(|e| e.field == "simulation.ticks"));
    }

    #[test]
    fn validation_catches_overfilled_units() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.sources[0].fuel = 500.0;
        cfg.storages[0].energy = -1.0;
        cfg.sources[0].fuel_efficiency = 1.5;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "sources[0].fuel"));
        assert!(errors.iter().any(|e| e.field == "sources[0].fuel_efficiency"));
        assert!(errors.iter().any(|e| e.field == "storages[0].energy"));
    }

    #[test]
    fn validation_catches_bad_profile_model() {
        let mut cfg = ScenarioConfig::baseline();
        if let Some(profile) = cfg.consumers[0].profile.as_mut() {
            profile.model = "square".to_string();
        }
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "consumers[0].profile.model"));
    }

    #[test]
    fn validation_catches_unknown_and_duplicate_players() {
        let mut cfg = ScenarioConfig::player_exchange();
        cfg.conduits[0].players.push(99);
        cfg.players.push(PlayerConfig {
            id: 1,
            energy: 0.0,
            capacity: 10.0,
        });
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "conduits[0].players"));
        assert!(errors.iter().any(|e| e.field == "players[3].id"));
    }

    #[test]
    fn error_display_names_field() {
        let e = ConfigError::new("storages[0].energy", "must be >= 0");
        assert_eq!(e.to_string(), "config error: storages[0].energy: must be >= 0");
    }
}
