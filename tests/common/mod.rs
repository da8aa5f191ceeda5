//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use powernet_sim::config::ScenarioConfig;
use powernet_sim::scenario::build_engine;
use powernet_sim::sim::engine::Engine;
use powernet_sim::units::{PlayerEnergyFns, PlayerId};

/// Counts how often and how much the simulator wrote to players.
#[derive(Debug, Default)]
pub struct CallLog {
    pub adds: Cell<usize>,
    pub subtracts: Cell<usize>,
    pub added: Cell<f32>,
    pub subtracted: Cell<f32>,
}

/// Player accessor with fixed energy and capacity that records every write.
///
/// Returns the accessor and a handle to its call log.
pub fn recording_access(energy: f32, capacity: f32) -> (PlayerEnergyFns, Rc<CallLog>) {
    let log = Rc::new(CallLog::default());
    let on_add = Rc::clone(&log);
    let on_subtract = Rc::clone(&log);
    let access = PlayerEnergyFns::new()
        .get_energy(move |_: PlayerId| energy)
        .get_capacity(move |_: PlayerId| capacity)
        .on_add(move |_, amount| {
            on_add.adds.set(on_add.adds.get() + 1);
            on_add.added.set(on_add.added.get() + amount);
        })
        .on_subtract(move |_, amount| {
            on_subtract.subtracts.set(on_subtract.subtracts.get() + 1);
            on_subtract
                .subtracted
                .set(on_subtract.subtracted.get() + amount);
        });
    (access, log)
}

/// Builds the engine for a built-in preset, panicking on invalid presets.
pub fn preset_engine(name: &str) -> Engine {
    let cfg = ScenarioConfig::from_preset(name)
        .unwrap_or_else(|e| panic!("preset {name} should exist: {e}"));
    build_engine(&cfg).unwrap_or_else(|errors| panic!("preset {name} should build: {errors:?}"))
}
