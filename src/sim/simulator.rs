//! Fixed-step energy allocation for one power network.

use serde::Deserialize;

use super::allocation::{charge_in_order, commit_sources, discharge_in_order};
use super::snapshot::SimulationSnapshot;
use super::types::TickReport;
use crate::units::{ConduitMode, StorageUnit};

/// Engine-level tuning shared by every network.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatorConfig {
    /// Most fuel a single source may burn per second.
    pub fuel_burn_rate: f32,
    /// Multiplier applied on top of each source's `yield * efficiency`.
    pub fuel_energy_scale: f32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            fuel_burn_rate: 1.0,
            fuel_energy_scale: 2.0,
        }
    }
}

/// Advances a network's energy state one tick at a time.
///
/// The simulator carries only tuning constants; all state lives in the
/// records borrowed by the [`SimulationSnapshot`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerSystemSimulator {
    config: SimulatorConfig,
}

impl PowerSystemSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Advances the snapshot by `snapshot.delta_time` seconds.
    ///
    /// Runs in two phases. The peek phase sums consumer and charge-conduit
    /// demand, the output every running source could give, and the energy
    /// held in storages, without mutating anything. The commit phase then
    /// serves consumers first and charge conduits second (first come, first
    /// served, in list order), discharges storages for whatever sources could
    /// not cover, stores any source surplus, burns fuel for exactly the
    /// energy drawn, and finally lets drain conduits fill the remaining
    /// storage room from players.
    ///
    /// A non-positive or non-finite `delta_time` leaves every unit untouched.
    pub fn simulate(&self, snapshot: &mut SimulationSnapshot<'_>) -> TickReport {
        if !snapshot.has_valid_delta_time() {
            return TickReport::idle(snapshot.total_stored_energy());
        }
        let dt = snapshot.delta_time;
        let max_fuel = self.config.fuel_burn_rate * dt;
        let scale = self.config.fuel_energy_scale;

        let sources = &mut *snapshot.sources;
        let storages = &mut *snapshot.storages;
        let consumers = &mut *snapshot.consumers;
        let conduits = &mut *snapshot.conduits;

        // Peek.
        let consumer_demand: f32 = consumers.iter().map(|c| c.requested_energy(dt)).sum();
        let conduit_demand: f32 = conduits.iter().map(|c| c.peek_charge_demand(dt)).sum();
        let estimated_conduit_demand: f32 = conduits.iter().map(|c| c.estimate_demand()).sum();
        let source_supply: f32 = sources
            .iter()
            .map(|s| s.peek_energy_output(max_fuel, scale))
            .sum();
        let storage_supply: f32 = storages.iter().map(StorageUnit::available).sum();

        let demand = consumer_demand + conduit_demand;
        let from_sources = demand.min(source_supply);
        let from_storage = (demand - from_sources).min(storage_supply).max(0.0);
        let mut budget = from_sources + from_storage;

        // Commit: consumers, then charge conduits.
        for consumer in consumers.iter_mut() {
            let requested = consumer.requested_energy(dt);
            if requested <= 0.0 {
                continue;
            }
            let given = requested.min(budget);
            consumer.apply_power(given, requested);
            budget -= given;
        }

        let mut player_charged = 0.0;
        for conduit in conduits.iter_mut() {
            if conduit.mode != ConduitMode::Charge {
                continue;
            }
            let moved = conduit.commit_charge(dt, budget);
            conduit.set_last_transferred(moved);
            budget -= moved;
            player_charged += moved;
        }

        // Conduits sharing a player can leave part of the budget unspent;
        // only what was actually handed out is drawn.
        let delivered = (from_sources + from_storage - budget.max(0.0)).max(0.0);
        let source_share = delivered.min(source_supply);
        let storage_share = delivered - source_share;

        let storage_discharged = discharge_in_order(storages, storage_share);
        let surplus_stored = charge_in_order(storages, source_supply - source_share);
        let source_output = source_share + surplus_stored;
        let fuel_burned = commit_sources(sources, source_output, max_fuel, scale);

        let mut player_drained = 0.0;
        for conduit in conduits.iter_mut() {
            if conduit.mode != ConduitMode::Drain {
                continue;
            }
            let room: f32 = storages.iter().map(StorageUnit::headroom).sum();
            let moved = conduit.commit_drain(dt, room);
            charge_in_order(storages, moved);
            conduit.set_last_transferred(moved);
            player_drained += moved;
        }

        let unmet = (demand - delivered).max(0.0);
        let satisfaction = if demand > 0.0 {
            (delivered / demand).min(1.0)
        } else {
            1.0
        };

        TickReport {
            demand,
            delivered,
            unmet,
            source_output,
            fuel_burned,
            storage_charged: surplus_stored + player_drained,
            storage_discharged,
            player_charged,
            player_drained,
            estimated_conduit_demand,
            stored_energy: storages.iter().map(StorageUnit::energy).sum(),
            satisfaction,
        }
    }
}
