//! Main simulator interface.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::circuit::{Netlist, NetlistCache, PinRef, PinValues, Wire};
use crate::components::{Component, DEFAULT_SCOPE_HISTORY, MAX_SCOPE_HISTORY};
use crate::error::{LabError, Result};
use crate::sketch::DEFAULT_MIN_CYCLE_MS;
use crate::DEFAULT_TICK_MS;

use super::resolve::resolve;

/// Configuration for the simulator.
///
/// Read from the optional `config` object of a board file; every field
/// may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulatorConfig {
    /// Simulated milliseconds per tick.
    pub tick_ms: u64,
    /// Shortest sketch loop period, in milliseconds.
    pub min_cycle_ms: u64,
    /// Samples kept by oscilloscopes that do not set their own length.
    pub scope_history: usize,
    /// Reuse the netlist while the wiring is unchanged.
    pub cache_netlist: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            min_cycle_ms: DEFAULT_MIN_CYCLE_MS,
            scope_history: DEFAULT_SCOPE_HISTORY,
            cache_netlist: true,
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tick period.
    pub fn with_tick_ms(mut self, tick_ms: u64) -> Self {
        self.tick_ms = tick_ms;
        self
    }

    /// Set the shortest sketch loop period.
    pub fn with_min_cycle_ms(mut self, min_cycle_ms: u64) -> Self {
        self.min_cycle_ms = min_cycle_ms;
        self
    }

    /// Set the default oscilloscope history length.
    pub fn with_scope_history(mut self, samples: usize) -> Self {
        self.scope_history = samples;
        self
    }

    /// Enable or disable netlist caching.
    ///
    /// Results are identical either way; disabling rebuilds every tick.
    pub fn with_cache_netlist(mut self, cache: bool) -> Self {
        self.cache_netlist = cache;
        self
    }

    /// Reject parameters that would make a tick ill-defined.
    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(LabError::invalid_config("tick period must be at least 1 ms"));
        }
        if self.min_cycle_ms == 0 {
            return Err(LabError::invalid_config("minimum loop period must be at least 1 ms"));
        }
        if self.scope_history == 0 {
            return Err(LabError::invalid_config("oscilloscope history must hold at least one sample"));
        }
        if self.scope_history > MAX_SCOPE_HISTORY {
            return Err(LabError::invalid_config(format!(
                "oscilloscope history of {} exceeds the maximum of {}",
                self.scope_history, MAX_SCOPE_HISTORY
            )));
        }
        Ok(())
    }
}

/// The simulation clock.
///
/// Owns only what carries from one tick to the next: simulated time, the
/// resolved pin values fed back as inputs, and the netlist cache.
/// Components and wires stay with the caller and are passed to each
/// [`Simulator::step`].
#[derive(Debug, Default)]
pub struct Simulator {
    config: SimulatorConfig,
    /// Simulated time of the next tick
    time_ms: u64,
    ticks: u64,
    /// Values resolved by the last tick
    inputs: PinValues,
    netlist: NetlistCache,
}

impl Simulator {
    /// Create a new simulator with default configuration.
    pub fn new() -> Self {
        Self::with_config(SimulatorConfig::default())
    }

    /// Create a new simulator with custom configuration.
    pub fn with_config(config: SimulatorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Run one tick.
    ///
    /// Sketches are evaluated at the current simulated time, then every
    /// component drives its pins from the values resolved on the previous
    /// tick, and the drives are resolved over the current wiring. The
    /// result becomes the next tick's inputs.
    pub fn step(&mut self, components: &mut [Component], wires: &[Wire]) -> &PinValues {
        for component in components.iter_mut() {
            component.device.run_program(self.time_ms, self.config.min_cycle_ms);
        }

        let uncached;
        let netlist = if self.config.cache_netlist {
            self.netlist.netlist_for(components, wires)
        } else {
            uncached = Netlist::build(components, wires);
            &uncached
        };

        let mut drives = PinValues::new();
        for component in components.iter_mut() {
            let inputs = self.inputs.for_component(&component.id);
            for (pin, value) in component.drive(inputs) {
                drives.insert(&component.id, &pin, value);
            }
        }

        self.inputs = resolve(netlist, &drives);

        tracing::trace!(
            tick = self.ticks,
            time_ms = self.time_ms,
            nets = netlist.len(),
            driven = drives.len(),
            "tick"
        );

        self.ticks += 1;
        self.time_ms = self.time_ms.saturating_add(self.config.tick_ms);
        &self.inputs
    }

    /// Run one tick over a loaded board.
    pub fn step_board(&mut self, board: &mut Board) -> &PinValues {
        self.step(&mut board.components, &board.wires)
    }

    /// Run `ticks` ticks, returning the values after the last one.
    pub fn run(&mut self, components: &mut [Component], wires: &[Wire], ticks: u64) -> &PinValues {
        for _ in 0..ticks {
            self.step(components, wires);
        }
        &self.inputs
    }

    /// Simulated time the next tick will run at.
    pub fn time_ms(&self) -> u64 {
        self.time_ms
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Values resolved by the last tick.
    pub fn values(&self) -> &PinValues {
        &self.inputs
    }

    /// Resolved value of one pin, 0 if undriven.
    pub fn pin_value(&self, pin: &PinRef) -> f64 {
        self.inputs.value(pin)
    }

    /// Rewind to time zero with no carried inputs.
    pub fn reset(&mut self) {
        self.time_ms = 0;
        self.ticks = 0;
        self.inputs.clear();
        self.netlist.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::PartType;

    fn wire(id: &str, a: (&str, &str), b: (&str, &str)) -> Wire {
        Wire::new(id, PinRef::new(a.0, a.1), PinRef::new(b.0, b.1))
    }

    #[test]
    fn test_config_validate() {
        assert!(SimulatorConfig::default().validate().is_ok());
        assert!(SimulatorConfig::new().with_tick_ms(0).validate().is_err());
        assert!(SimulatorConfig::new().with_min_cycle_ms(0).validate().is_err());
        assert!(SimulatorConfig::new().with_scope_history(0).validate().is_err());
        assert!(SimulatorConfig::new()
            .with_scope_history(MAX_SCOPE_HISTORY)
            .validate()
            .is_ok());
        assert!(matches!(
            SimulatorConfig::new().with_scope_history(MAX_SCOPE_HISTORY + 1).validate(),
            Err(LabError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_config_partial_json() {
        let config: SimulatorConfig = serde_json::from_str(r#"{"tickMs": 50}"#).unwrap();
        assert_eq!(config.tick_ms, 50);
        assert_eq!(config.min_cycle_ms, DEFAULT_MIN_CYCLE_MS);
        assert!(config.cache_netlist);
    }

    #[test]
    fn test_clock_advances() {
        let mut sim = Simulator::with_config(SimulatorConfig::new().with_tick_ms(25));
        let mut components = vec![Component::new("S1", PartType::ToggleSwitch)];
        sim.run(&mut components, &[], 4);
        assert_eq!(sim.time_ms(), 100);
        assert_eq!(sim.ticks(), 4);

        sim.reset();
        assert_eq!(sim.time_ms(), 0);
        assert!(sim.values().is_empty());
    }

    #[test]
    fn test_gate_sees_previous_tick() {
        let mut components = vec![
            Component::new("S1", PartType::ToggleSwitch),
            Component::new("N1", PartType::Not),
            Component::new("L1", PartType::LedLamp),
        ];
        components[0].set_switch(true).unwrap();
        let wires = vec![wire("w1", ("S1", "OUT"), ("N1", "IN")), wire("w2", ("N1", "OUT"), ("L1", "IN"))];

        let mut sim = Simulator::new();
        let led = PinRef::new("L1", "IN");

        // NOT has not seen the switch yet
        assert_eq!(sim.step(&mut components, &wires).value(&led), 1.0);
        assert_eq!(sim.step(&mut components, &wires).value(&led), 0.0);
    }

    #[test]
    fn test_uncached_matches_cached() {
        let build = || {
            (
                vec![
                    Component::new("U1", PartType::ArduinoUno),
                    Component::new("BB", PartType::Breadboard),
                    Component::new("L1", PartType::LedLamp),
                ],
                vec![wire("w1", ("U1", "13"), ("BB", "L1")), wire("w2", ("BB", "R1"), ("L1", "IN"))],
            )
        };

        let (mut a, wires) = build();
        let (mut b, _) = build();
        let mut cached = Simulator::new();
        let mut uncached = Simulator::with_config(SimulatorConfig::new().with_cache_netlist(false));

        for _ in 0..25 {
            let x = cached.step(&mut a, &wires).sorted();
            let y = uncached.step(&mut b, &wires).sorted();
            assert_eq!(x, y);
        }
    }
}
