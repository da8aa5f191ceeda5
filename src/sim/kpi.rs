//! Post-hoc KPI computation from simulation records.

use std::fmt;

use super::types::TickRecord;

/// Aggregate key performance indicators derived from a complete run.
///
/// Computed post-hoc from `Vec<TickRecord>` so the reported metrics always
/// agree with the per-tick data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpiReport {
    /// Energy requested by consumers and charge conduits.
    pub total_demand: f32,
    /// Energy actually delivered.
    pub total_delivered: f32,
    /// `100 * delivered / demand`, or 100 when nothing was requested.
    pub served_pct: f32,
    /// Energy requested but not delivered.
    pub total_unmet: f32,
    /// Energy produced from fuel.
    pub energy_produced: f32,
    /// Fuel burned across all sources.
    pub fuel_burned: f32,
    /// Largest single-tick demand.
    pub peak_demand: f32,
    /// Ticks in which some demand went unserved.
    pub brownout_ticks: usize,
    /// Energy pushed to players.
    pub player_charged: f32,
    /// Energy pulled from players.
    pub player_drained: f32,
    /// Energy held in storages after the last tick.
    pub final_stored_energy: f32,
}

impl KpiReport {
    /// Computes all KPIs from the complete tick record vector.
    pub fn from_records(records: &[TickRecord]) -> Self {
        let Some(last) = records.last() else {
            return Self {
                served_pct: 100.0,
                ..Self::default()
            };
        };

        let mut kpi = Self {
            final_stored_energy: last.report.stored_energy,
            ..Self::default()
        };
        for r in records.iter().map(|record| &record.report) {
            kpi.total_demand += r.demand;
            kpi.total_delivered += r.delivered;
            kpi.total_unmet += r.unmet;
            kpi.energy_produced += r.source_output;
            kpi.fuel_burned += r.fuel_burned;
            kpi.peak_demand = kpi.peak_demand.max(r.demand);
            kpi.player_charged += r.player_charged;
            kpi.player_drained += r.player_drained;
            if r.is_brownout() {
                kpi.brownout_ticks += 1;
            }
        }

        kpi.served_pct = if kpi.total_demand > 0.0 {
            100.0 * kpi.total_delivered / kpi.total_demand
        } else {
            100.0
        };
        kpi
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- KPI Report ---")?;
        writeln!(
            f,
            "Demand served:         {:.2} / {:.2} ({:.1}%)",
            self.total_delivered, self.total_demand, self.served_pct
        )?;
        writeln!(f, "Unmet demand:          {:.2}", self.total_unmet)?;
        writeln!(f, "Peak demand:           {:.2}", self.peak_demand)?;
        writeln!(
            f,
            "Energy produced:       {:.2} ({:.3} fuel burned)",
            self.energy_produced, self.fuel_burned
        )?;
        writeln!(
            f,
            "Player exchange:       +{:.2} charged / -{:.2} drained",
            self.player_charged, self.player_drained
        )?;
        writeln!(f, "Final stored energy:   {:.2}", self.final_stored_energy)?;
        write!(f, "Brownout ticks:        {}", self.brownout_ticks)
    }
}
