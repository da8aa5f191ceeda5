use std::fmt;

use serde::Deserialize;

use crate::units::ledger::{PlayerEnergyLedger, PlayerEnergySource, PlayerId};
use crate::units::types::{Unit, non_negative};

/// Direction a conduit moves energy in. Only one direction is active per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConduitMode {
    /// Network to players.
    Charge,
    /// Players to network storages.
    Drain,
}

impl fmt::Display for ConduitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Charge => f.write_str("charge"),
            Self::Drain => f.write_str("drain"),
        }
    }
}

/// A bridge between the network and connected players' energy pools.
///
/// Each connected player can move at most `transfer_rate * dt` energy per
/// tick. A conduit never pushes a player above capacity or pulls one below
/// zero, and one without a wired accessor moves nothing.
pub struct ConduitUnit {
    /// Active transfer direction.
    pub mode: ConduitMode,

    /// Energy per second each connected player may exchange.
    pub transfer_rate: f32,

    ledger: PlayerEnergyLedger,
    demand_estimator: Option<Box<dyn Fn() -> f32>>,
    last_transferred: f32,
}

impl ConduitUnit {
    /// Creates a conduit with no accessor and no connected players.
    pub fn new(mode: ConduitMode, transfer_rate: f32) -> Self {
        Self {
            mode,
            transfer_rate: non_negative(transfer_rate),
            ledger: PlayerEnergyLedger::new(),
            demand_estimator: None,
            last_transferred: 0.0,
        }
    }

    /// Returns the conduit wired to a player-energy accessor.
    pub fn with_access(mut self, access: impl PlayerEnergySource + 'static) -> Self {
        self.ledger.set_access(access);
        self
    }

    /// Returns the conduit with the given players connected.
    pub fn with_players(mut self, players: impl IntoIterator<Item = PlayerId>) -> Self {
        for id in players {
            self.ledger.connect(id);
        }
        self
    }

    /// Returns the conduit with a caller-supplied demand estimate.
    ///
    /// The estimate is reporting-only; transfers are always computed from
    /// the players' actual pools.
    pub fn with_demand_estimator(mut self, estimator: impl Fn() -> f32 + 'static) -> Self {
        self.demand_estimator = Some(Box::new(estimator));
        self
    }

    pub fn ledger(&self) -> &PlayerEnergyLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut PlayerEnergyLedger {
        &mut self.ledger
    }

    pub fn connect_player(&mut self, player: PlayerId) -> bool {
        self.ledger.connect(player)
    }

    pub fn disconnect_player(&mut self, player: PlayerId) -> bool {
        self.ledger.disconnect(player)
    }

    /// Demand this conduit expects to place on (or offer to) the network per second.
    ///
    /// Uses the caller's estimator when one is set, otherwise
    /// `transfer_rate * reachable players`.
    pub fn estimate_demand(&self) -> f32 {
        match &self.demand_estimator {
            Some(estimate) => non_negative(estimate()),
            None => self.transfer_rate * self.ledger.player_count() as f32,
        }
    }

    /// Energy moved during the most recent tick.
    pub fn last_transferred(&self) -> f32 {
        self.last_transferred
    }

    /// Most energy a single player may exchange in a tick of `delta_time`.
    pub fn per_player_limit(&self, delta_time: f32) -> f32 {
        non_negative(self.transfer_rate * delta_time)
    }

    /// Energy a charge-mode conduit would push to players this tick.
    pub fn peek_charge_demand(&self, delta_time: f32) -> f32 {
        if self.mode != ConduitMode::Charge {
            return 0.0;
        }
        self.ledger
            .peek_charge_demand(self.per_player_limit(delta_time))
    }

    /// Energy a drain-mode conduit could pull from players this tick.
    pub fn peek_drain_offer(&self, delta_time: f32) -> f32 {
        if self.mode != ConduitMode::Drain {
            return 0.0;
        }
        self.ledger.peek_drain_offer(self.per_player_limit(delta_time))
    }

    /// Hands up to `budget` network energy to players. Charge mode only.
    pub(crate) fn commit_charge(&mut self, delta_time: f32, budget: f32) -> f32 {
        if self.mode != ConduitMode::Charge {
            return 0.0;
        }
        let per_player = self.per_player_limit(delta_time);
        self.ledger.charge_players(per_player, budget)
    }

    /// Pulls up to `room` energy from players. Drain mode only.
    pub(crate) fn commit_drain(&mut self, delta_time: f32, room: f32) -> f32 {
        if self.mode != ConduitMode::Drain {
            return 0.0;
        }
        let per_player = self.per_player_limit(delta_time);
        self.ledger.drain_players(per_player, room)
    }

    pub(crate) fn set_last_transferred(&mut self, energy: f32) {
        self.last_transferred = energy;
    }

    pub(crate) fn sanitize(&mut self) {
        self.transfer_rate = non_negative(self.transfer_rate);
    }
}

impl Unit for ConduitUnit {
    fn unit_type(&self) -> &'static str {
        match self.mode {
            ConduitMode::Charge => "ChargeConduit",
            ConduitMode::Drain => "DrainConduit",
        }
    }
}

impl fmt::Debug for ConduitUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConduitUnit")
            .field("mode", &self.mode)
            .field("transfer_rate", &self.transfer_rate)
            .field("ledger", &self.ledger)
            .field("has_demand_estimator", &self.demand_estimator.is_some())
            .field("last_transferred", &self.last_transferred)
            .finish()
    }
}
