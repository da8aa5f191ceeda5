//! List-order energy distribution across storages and sources.
//!
//! Every helper walks its slice front to back and fully serves one unit
//! before moving to the next. There is no proportional sharing.

use crate::units::{SourceUnit, StorageUnit};

/// Charges storages in list order with up to `amount` energy.
///
/// Returns the energy actually accepted.
pub fn charge_in_order(storages: &mut [StorageUnit], amount: f32) -> f32 {
    let mut remaining = amount;
    let mut accepted = 0.0;
    for storage in storages.iter_mut() {
        if remaining <= 0.0 {
            break;
        }
        let taken = storage.charge(remaining);
        remaining -= taken;
        accepted += taken;
    }
    accepted
}

/// Discharges storages in list order by up to `amount` energy.
///
/// Returns the energy actually removed.
pub fn discharge_in_order(storages: &mut [StorageUnit], amount: f32) -> f32 {
    let mut remaining = amount;
    let mut removed = 0.0;
    for storage in storages.iter_mut() {
        if remaining <= 0.0 {
            break;
        }
        let given = storage.discharge(remaining);
        remaining -= given;
        removed += given;
    }
    removed
}

/// Draws `energy` from sources in list order and burns the matching fuel.
///
/// Each source gives at most what it reports through
/// [`SourceUnit::peek_energy_output`] for the same `max_fuel` and
/// `energy_scale`. Returns the total fuel burned.
pub fn commit_sources(
    sources: &mut [SourceUnit],
    energy: f32,
    max_fuel: f32,
    energy_scale: f32,
) -> f32 {
    let mut remaining = energy;
    let mut burned = 0.0;
    for source in sources.iter_mut() {
        if remaining <= 0.0 {
            break;
        }
        let offer = source.peek_energy_output(max_fuel, energy_scale);
        let drawn = offer.min(remaining);
        if drawn > 0.0 {
            burned += source.commit_energy_used(drawn, energy_scale);
            remaining -= drawn;
        }
    }
    burned
}
