use std::fmt;

use super::types::TickReport;

/// Network state transitions. Emitted only when the state changes, not every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NetworkEvent {
    /// The network stopped meeting its demand.
    Brownout {
        tick: usize,
        /// Energy requested but not delivered on the transition tick.
        deficit: f32,
    },
    /// Demand is fully met again after a brownout.
    Restored { tick: usize },
}

impl fmt::Display for NetworkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brownout { tick, deficit } => {
                write!(f, "brownout at t={tick} (deficit {deficit:.2})")
            }
            Self::Restored { tick } => write!(f, "restored at t={tick}"),
        }
    }
}

/// Remembers whether the network was browned out on the previous tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrownoutTracker {
    was_brownout: bool,
}

impl BrownoutTracker {
    pub fn is_brownout(&self) -> bool {
        self.was_brownout
    }

    /// Feeds one tick's report and returns the transition, if any.
    pub fn observe(&mut self, tick: usize, report: &TickReport) -> Option<NetworkEvent> {
        let now = report.is_brownout();
        let event = match (self.was_brownout, now) {
            (false, true) => Some(NetworkEvent::Brownout {
                tick,
                deficit: report.unmet,
            }),
            (true, false) => Some(NetworkEvent::Restored { tick }),
            _ => None,
        };
        self.was_brownout = now;
        event
    }
}
