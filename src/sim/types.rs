//! Core simulation types: run configuration and per-tick results.

use std::fmt;

use super::event::NetworkEvent;

/// Run configuration shared by the engine and reporting.
///
/// # Examples
///
/// ```
/// use powernet_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::new(0.5, 120, 42);
/// assert_eq!(cfg.duration_s(), 60.0);
/// ```
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Tick length in seconds.
    pub delta_time: f32,
    /// Number of ticks to run.
    pub ticks: usize,
    /// Master random seed for load profiles.
    pub seed: u64,
}

impl SimConfig {
    /// Creates a new run configuration.
    ///
    /// # Panics
    ///
    /// Panics if `delta_time` is not a positive finite number or `ticks` is zero.
    pub fn new(delta_time: f32, ticks: usize, seed: u64) -> Self {
        assert!(
            delta_time.is_finite() && delta_time > 0.0,
            "delta_time must be > 0"
        );
        assert!(ticks > 0, "ticks must be > 0");
        Self {
            delta_time,
            ticks,
            seed,
        }
    }

    /// Simulated time covered by the whole run, in seconds.
    pub fn duration_s(&self) -> f32 {
        self.delta_time * self.ticks as f32
    }
}

/// What one call to the simulator moved.
///
/// All quantities are energy for the tick, not rates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// Consumer requests plus charge-conduit requests.
    pub demand: f32,
    /// Energy actually handed to consumers and charge conduits.
    pub delivered: f32,
    /// `demand - delivered`.
    pub unmet: f32,
    /// Energy drawn from fuel (demand share plus surplus stored).
    pub source_output: f32,
    /// Fuel burned across all sources.
    pub fuel_burned: f32,
    /// Energy added to storages (source surplus plus drained player energy).
    pub storage_charged: f32,
    /// Energy removed from storages to cover demand.
    pub storage_discharged: f32,
    /// Energy pushed to players by charge conduits.
    pub player_charged: f32,
    /// Energy pulled from players by drain conduits.
    pub player_drained: f32,
    /// Sum of the conduits' own demand estimates.
    pub estimated_conduit_demand: f32,
    /// Energy held in storages after the tick.
    pub stored_energy: f32,
    /// `delivered / demand`, or 1.0 when nothing was requested.
    pub satisfaction: f32,
}

impl TickReport {
    /// Report for a tick in which nothing was simulated.
    pub fn idle(stored_energy: f32) -> Self {
        Self {
            stored_energy,
            satisfaction: 1.0,
            ..Self::default()
        }
    }

    /// Returns `true` if some demand went unserved.
    pub fn is_brownout(&self) -> bool {
        self.satisfaction < 1.0 - 1e-4
    }
}

impl fmt::Display for TickReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "demand={:.2} delivered={:.2} unmet={:.2} | fuel={:.3} out={:.2} | \
             store(+{:.2} -{:.2} ={:.2}) | players(+{:.2} -{:.2}) sat={:.0}%",
            self.demand,
            self.delivered,
            self.unmet,
            self.fuel_burned,
            self.source_output,
            self.storage_charged,
            self.storage_discharged,
            self.stored_energy,
            self.player_charged,
            self.player_drained,
            self.satisfaction * 100.0,
        )
    }
}

/// Complete record of one engine tick.
#[derive(Debug, Clone)]
pub struct TickRecord {
    /// Tick index.
    pub tick: usize,
    /// Simulation time at the start of the tick, in seconds.
    pub time_s: f32,
    /// Simulator output for the tick.
    pub report: TickReport,
    /// Fuel left across all sources after the tick.
    pub total_fuel: f32,
    /// Energy held by all known players after the tick.
    pub total_player_energy: f32,
    /// Brownout/restore transitions observed on this tick.
    pub events: Vec<NetworkEvent>,
}

impl fmt::Display for TickRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>4} ({:>7.1}s) | {} | fuel_left={:.2} player_energy={:.2}",
            self.tick, self.time_s, self.report, self.total_fuel, self.total_player_energy,
        )?;
        for event in &self.events {
            write!(f, " [{event}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_config_basic() {
        let cfg = SimConfig::new(1.0, 24, 7);
        assert_eq!(cfg.ticks, 24);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.duration_s(), 24.0);
    }

    #[test]
    #[should_panic]
    fn sim_config_zero_ticks_panics() {
        SimConfig::new(1.0, 0, 0);
    }

    #[test]
    #[should_panic]
    fn sim_config_negative_dt_panics() {
        SimConfig::new(-1.0, 10, 0);
    }

    #[test]
    fn idle_report_is_satisfied() {
        let report = TickReport::idle(12.0);
        assert_eq!(report.stored_energy, 12.0);
        assert!(!report.is_brownout());
    }

    #[test]
    fn tick_record_display_does_not_panic() {
        let record = TickRecord {
            tick: 3,
            time_s: 3.0,
            report: TickReport {
                demand: 10.0,
                delivered: 6.0,
                unmet: 4.0,
                satisfaction: 0.6,
                ..TickReport::default()
            },
            total_fuel: 2.0,
            total_player_energy: 40.0,
            events: vec![NetworkEvent::Brownout {
                tick: 3,
                deficit: 4.0,
            }],
        };
        let s = format!("{record}");
        assert!(s.contains("brownout"));
    }
}
