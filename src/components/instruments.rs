//! Measurement tools. They observe their inputs and drive nothing.

use std::collections::VecDeque;

use crate::circuit::PinInputs;

/// Default number of samples an oscilloscope keeps.
pub const DEFAULT_SCOPE_HISTORY: usize = 200;

/// Largest history an oscilloscope may keep.
pub const MAX_SCOPE_HISTORY: usize = 100_000;

/// Single-channel oscilloscope recording `IN` once per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Oscilloscope {
    history: VecDeque<f64>,
    capacity: usize,
    /// Milliseconds per horizontal division (display only)
    pub time_scale: f64,
    /// Volts per vertical division (display only)
    pub volt_scale: f64,
}

impl Default for Oscilloscope {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_SCOPE_HISTORY)
    }
}

impl Oscilloscope {
    /// Create a scope keeping at most `capacity` samples, within
    /// `1..=MAX_SCOPE_HISTORY`. Storage grows as samples arrive.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            history: VecDeque::new(),
            capacity: capacity.clamp(1, MAX_SCOPE_HISTORY),
            time_scale: 100.0,
            volt_scale: 1.0,
        }
    }

    /// Append the current `IN` value, dropping the oldest sample when full.
    pub fn record(&mut self, inputs: PinInputs<'_>) {
        self.push(inputs.value("IN"));
    }

    fn push(&mut self, sample: f64) {
        while self.history.len() >= self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(sample);
    }

    /// Samples, oldest first.
    pub fn history(&self) -> impl Iterator<Item = f64> + '_ {
        self.history.iter().copied()
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<f64> {
        self.history.back().copied()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the bound, discarding the oldest samples if it shrinks.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.clamp(1, MAX_SCOPE_HISTORY);
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

/// Multimeter showing the difference between its probes.
#[derive(Debug, Clone, PartialEq)]
pub struct Multimeter {
    /// Display mode, e.g. `VOLTS`
    pub mode: String,
}

impl Default for Multimeter {
    fn default() -> Self {
        Self {
            mode: "VOLTS".to_string(),
        }
    }
}

impl Multimeter {
    /// Reading across `V+` and `V-`.
    pub fn reading(&self, inputs: PinInputs<'_>) -> f64 {
        inputs.value("V+") - inputs.value("V-")
    }
}
