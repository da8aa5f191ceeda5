//! Player-energy access for conduits.
//!
//! The simulator never talks to the host's player system directly. Each
//! conduit carries a [`PlayerEnergyLedger`]: the set of connected player ids
//! plus an injected [`PlayerEnergySource`] used to read and move energy.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use crate::units::types::non_negative;

/// Identifier of a player as known to the host.
pub type PlayerId = u64;

/// Capability interface over players' personal energy pools.
///
/// Implementations are expected to clamp on their side as well, but the
/// ledger never relies on that: it only ever asks to add up to the reported
/// room and subtract up to the reported energy.
pub trait PlayerEnergySource {
    /// Current energy held by `player`.
    fn energy(&self, player: PlayerId) -> f32;

    /// Maximum energy `player` can hold.
    fn capacity(&self, player: PlayerId) -> f32;

    /// Gives `amount` energy to `player` and returns the amount applied.
    fn add(&mut self, player: PlayerId, amount: f32) -> f32;

    /// Takes `amount` energy from `player` and returns the amount applied.
    fn subtract(&mut self, player: PlayerId, amount: f32) -> f32;

    /// Whether [`add`](Self::add) can move energy at all.
    fn can_add(&self) -> bool {
        true
    }

    /// Whether [`subtract`](Self::subtract) can move energy at all.
    fn can_subtract(&self) -> bool {
        true
    }
}

impl<T: PlayerEnergySource> PlayerEnergySource for Rc<RefCell<T>> {
    fn energy(&self, player: PlayerId) -> f32 {
        self.try_borrow().map_or(0.0, |inner| inner.energy(player))
    }

    fn capacity(&self, player: PlayerId) -> f32 {
        self.try_borrow().map_or(0.0, |inner| inner.capacity(player))
    }

    fn add(&mut self, player: PlayerId, amount: f32) -> f32 {
        self.try_borrow_mut()
            .map_or(0.0, |mut inner| inner.add(player, amount))
    }

    fn subtract(&mut self, player: PlayerId, amount: f32) -> f32 {
        self.try_borrow_mut()
            .map_or(0.0, |mut inner| inner.subtract(player, amount))
    }

    fn can_add(&self) -> bool {
        self.try_borrow().is_ok_and(|inner| inner.can_add())
    }

    fn can_subtract(&self) -> bool {
        self.try_borrow().is_ok_and(|inner| inner.can_subtract())
    }
}

type Reader = Box<dyn Fn(PlayerId) -> f32>;
type Writer = Box<dyn FnMut(PlayerId, f32)>;

/// A [`PlayerEnergySource`] assembled from individual callbacks.
///
/// Any callback may be left unset: a missing reader reports zero and a
/// missing writer makes that direction unreachable, so a half-wired conduit
/// moves nothing instead of failing the tick.
#[derive(Default)]
pub struct PlayerEnergyFns {
    get_energy: Option<Reader>,
    get_capacity: Option<Reader>,
    add_energy: Option<Writer>,
    subtract_energy: Option<Writer>,
}

impl PlayerEnergyFns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_energy(mut self, f: impl Fn(PlayerId) -> f32 + 'static) -> Self {
        self.get_energy = Some(Box::new(f));
        self
    }

    pub fn get_capacity(mut self, f: impl Fn(PlayerId) -> f32 + 'static) -> Self {
        self.get_capacity = Some(Box::new(f));
        self
    }

    pub fn on_add(mut self, f: impl FnMut(PlayerId, f32) + 'static) -> Self {
        self.add_energy = Some(Box::new(f));
        self
    }

    pub fn on_subtract(mut self, f: impl FnMut(PlayerId, f32) + 'static) -> Self {
        self.subtract_energy = Some(Box::new(f));
        self
    }
}

impl PlayerEnergySource for PlayerEnergyFns {
    fn energy(&self, player: PlayerId) -> f32 {
        self.get_energy.as_ref().map_or(0.0, |f| f(player))
    }

    fn capacity(&self, player: PlayerId) -> f32 {
        self.get_capacity.as_ref().map_or(0.0, |f| f(player))
    }

    fn add(&mut self, player: PlayerId, amount: f32) -> f32 {
        match self.add_energy.as_mut() {
            Some(f) => {
                f(player, amount);
                amount
            }
            None => 0.0,
        }
    }

    fn subtract(&mut self, player: PlayerId, amount: f32) -> f32 {
        match self.subtract_energy.as_mut() {
            Some(f) => {
                f(player, amount);
                amount
            }
            None => 0.0,
        }
    }

    fn can_add(&self) -> bool {
        self.add_energy.is_some()
    }

    fn can_subtract(&self) -> bool {
        self.subtract_energy.is_some()
    }
}

impl fmt::Debug for PlayerEnergyFns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerEnergyFns")
            .field("get_energy", &self.get_energy.is_some())
            .field("get_capacity", &self.get_capacity.is_some())
            .field("add_energy", &self.add_energy.is_some())
            .field("subtract_energy", &self.subtract_energy.is_some())
            .finish()
    }
}

/// Connected players of one conduit and the accessor used to reach them.
///
/// Players are kept in a `BTreeSet` so transfers always visit them in
/// ascending id order.
#[derive(Default)]
pub struct PlayerEnergyLedger {
    players: BTreeSet<PlayerId>,
    access: Option<Box<dyn PlayerEnergySource>>,
}

impl PlayerEnergyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger wired to `access` with no connected players.
    pub fn with_access(access: impl PlayerEnergySource + 'static) -> Self {
        Self {
            players: BTreeSet::new(),
            access: Some(Box::new(access)),
        }
    }

    pub fn set_access(&mut self, access: impl PlayerEnergySource + 'static) {
        self.access = Some(Box::new(access));
    }

    pub fn clear_access(&mut self) {
        self.access = None;
    }

    pub fn has_access(&self) -> bool {
        self.access.is_some()
    }

    /// Connects a player. Returns `false` if it was already connected.
    pub fn connect(&mut self, player: PlayerId) -> bool {
        self.players.insert(player)
    }

    /// Disconnects a player. Returns `false` if it was not connected.
    pub fn disconnect(&mut self, player: PlayerId) -> bool {
        self.players.remove(&player)
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.players.contains(&player)
    }

    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().copied()
    }

    /// Number of connected players that can actually be reached.
    ///
    /// Without an accessor the ledger behaves as if nobody is connected.
    pub fn player_count(&self) -> usize {
        if self.access.is_some() {
            self.players.len()
        } else {
            0
        }
    }

    /// Current energy of `player`, or zero when unreachable.
    pub fn energy(&self, player: PlayerId) -> f32 {
        self.access
            .as_deref()
            .map_or(0.0, |access| non_negative(access.energy(player)))
    }

    /// Room left in `player`'s pool, or zero when unreachable.
    pub fn room(&self, player: PlayerId) -> f32 {
        self.access
            .as_deref()
            .map_or(0.0, |access| player_room(access, player))
    }

    /// Energy the connected players could accept, at most `per_player` each.
    pub fn peek_charge_demand(&self, per_player: f32) -> f32 {
        let Some(access) = self.access.as_deref().filter(|a| a.can_add()) else {
            return 0.0;
        };
        self.players
            .iter()
            .map(|&id| per_player.min(player_room(access, id)))
            .sum()
    }

    /// Energy the connected players could give up, at most `per_player` each.
    pub fn peek_drain_offer(&self, per_player: f32) -> f32 {
        let Some(access) = self.access.as_deref().filter(|a| a.can_subtract()) else {
            return 0.0;
        };
        self.players
            .iter()
            .map(|&id| per_player.min(non_negative(access.energy(id))))
            .sum()
    }

    /// Pushes energy to players in id order until `budget` runs out.
    ///
    /// Returns the total energy the accessor reports as applied.
    pub fn charge_players(&mut self, per_player: f32, budget: f32) -> f32 {
        let Some(access) = self.access.as_deref_mut() else {
            return 0.0;
        };
        if !access.can_add() {
            return 0.0;
        }
        let mut remaining = non_negative(budget);
        let mut total = 0.0;
        for &id in &self.players {
            if remaining <= 0.0 {
                break;
            }
            let give = per_player.min(player_room(&*access, id)).min(remaining);
            if give > 0.0 {
                let applied = non_negative(access.add(id, give)).min(give);
                remaining -= applied;
                total += applied;
            }
        }
        total
    }

    /// Pulls energy from players in id order, at most `room` in total.
    ///
    /// Returns the total energy the accessor reports as taken; the caller
    /// stores exactly that amount.
    pub fn drain_players(&mut self, per_player: f32, room: f32) -> f32 {
        let Some(access) = self.access.as_deref_mut() else {
            return 0.0;
        };
        if !access.can_subtract() {
            return 0.0;
        }
        let mut remaining = non_negative(room);
        let mut total = 0.0;
        for &id in &self.players {
            if remaining <= 0.0 {
                break;
            }
            let take = per_player
                .min(non_negative(access.energy(id)))
                .min(remaining);
            if take > 0.0 {
                let applied = non_negative(access.subtract(id, take)).min(take);
                remaining -= applied;
                total += applied;
            }
        }
        total
    }
}

fn player_room(access: &dyn PlayerEnergySource, player: PlayerId) -> f32 {
    (non_negative(access.capacity(player)) - non_negative(access.energy(player))).max(0.0)
}

impl fmt::Debug for PlayerEnergyLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerEnergyLedger")
            .field("players", &self.players)
            .field("has_access", &self.access.is_some())
            .finish()
    }
}
