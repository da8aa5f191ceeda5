//! In-memory player energy pools used by the host layer.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::units::types::non_negative;
use crate::units::{PlayerEnergySource, PlayerId};

/// One player's personal energy pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPool {
    pub energy: f32,
    pub capacity: f32,
}

impl PlayerPool {
    /// Creates a pool with `energy` clamped to `[0, capacity]`.
    pub fn new(energy: f32, capacity: f32) -> Self {
        let capacity = non_negative(capacity);
        Self {
            energy: non_negative(energy).min(capacity),
            capacity,
        }
    }
}

/// A roster shared between every conduit of a network.
pub type SharedRoster = Rc<RefCell<PlayerRoster>>;

/// Players known to the host, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct PlayerRoster {
    pools: BTreeMap<PlayerId, PlayerPool>,
}

impl PlayerRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps the roster for sharing between conduits.
    pub fn shared(self) -> SharedRoster {
        Rc::new(RefCell::new(self))
    }

    /// Adds or replaces a player's pool.
    pub fn insert(&mut self, player: PlayerId, pool: PlayerPool) {
        self.pools.insert(player, pool);
    }

    pub fn pool(&self, player: PlayerId) -> Option<&PlayerPool> {
        self.pools.get(&player)
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.pools.contains_key(&player)
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Energy held by all players together.
    pub fn total_energy(&self) -> f32 {
        self.pools.values().map(|p| p.energy).sum()
    }
}

impl PlayerEnergySource for PlayerRoster {
    fn energy(&self, player: PlayerId) -> f32 {
        self.pools.get(&player).map_or(0.0, |p| p.energy)
    }

    fn capacity(&self, player: PlayerId) -> f32 {
        self.pools.get(&player).map_or(0.0, |p| p.capacity)
    }

    fn add(&mut self, player: PlayerId, amount: f32) -> f32 {
        let Some(pool) = self.pools.get_mut(&player) else {
            return 0.0;
        };
        let before = pool.energy;
        pool.energy = (pool.energy + non_negative(amount)).min(pool.capacity);
        pool.energy - before
    }

    fn subtract(&mut self, player: PlayerId, amount: f32) -> f32 {
        let Some(pool) = self.pools.get_mut(&player) else {
            return 0.0;
        };
        let before = pool.energy;
        pool.energy = (pool.energy - non_negative(amount)).max(0.0);
        before - pool.energy
    }
}
